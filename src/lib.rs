//! Dealpulse - negotiation workflow and stall-risk analysis
//!
//! Dealpulse models the lifecycle of individual deal terms as a guarded state
//! machine and scores how likely a deal is to stall from its recent activity,
//! participant engagement and term progress.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **Domain Layer** (`domain`): value types, errors, and the clock and
//!   horizon ports
//! - **Service Layer** (`services`): the state machine and the analysis
//!   pipeline (velocity, risk factors, pattern matching, assessment)
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use dealpulse::domain::models::{DealBenchmark, DealSnapshot};
//! use dealpulse::services::StallRiskAssessor;
//!
//! let snapshot: DealSnapshot = serde_json::from_str(r#"{"dealId": "deal-1"}"#).unwrap();
//! let assessor = StallRiskAssessor::new();
//! let (_metrics, assessment) = assessor.assess_snapshot(&snapshot, &DealBenchmark::default());
//! assert_eq!(assessment.deal_id, "deal-1");
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    ActivityEvent, CategoryWithTerms, Config, DealBenchmark, DealSnapshot, NegotiationMode,
    NegotiationStatus, ParticipantEngagement, RiskLevel, StallRiskAssessment, TransitionContext,
    TransitionResult, VelocityMetrics,
};
pub use domain::ports::{Clock, StallHorizon};
pub use domain::{NegotiationError, NegotiationResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{PatternMatcher, StallRiskAssessor, VelocityCalculator};
