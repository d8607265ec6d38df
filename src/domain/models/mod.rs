pub mod activity;
pub mod benchmark;
pub mod config;
pub mod negotiation;
pub mod pattern;
pub mod risk;
pub mod snapshot;
pub mod terms;
pub mod velocity;

pub use activity::{
    ActivityEvent, ActivityEventType, DealRole, ParticipantEngagement, ParticipantProfile,
    NEVER_DAYS,
};
pub use benchmark::{DealBenchmark, VelocityRange};
pub use config::{Config, LogFormat, LoggingConfig, RotationPolicy};
pub use negotiation::{
    NegotiationMode, NegotiationStatus, StatusInfo, TransitionContext, TransitionResult,
};
pub use pattern::{HistoricalPattern, PatternCatalog, PatternSignature};
pub use risk::{
    HistoricalPatternMatch, OutcomeType, RiskFactor, RiskFactorType, RiskLevel, RiskSeverity,
    StallRiskAssessment,
};
pub use snapshot::DealSnapshot;
pub use terms::{term_progress, CategoryWithTerms, TermSummary};
pub use velocity::{EngagementTrend, VelocityMetrics, VelocityTrend};
