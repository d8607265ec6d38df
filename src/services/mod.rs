//! Service layer: the negotiation state machine and the stall-risk pipeline.
//!
//! ```text
//! activity log ─▶ velocity_metrics ─┬─▶ risk_factors ──┐
//!                                   └─▶ pattern_matcher ┴─▶ stall_risk
//! ```

pub mod engagement;
pub mod negotiation_state_machine;
pub mod pattern_matcher;
pub mod risk_factors;
pub mod stall_risk;
pub mod velocity_metrics;

pub use engagement::derive_participant_engagement;
pub use negotiation_state_machine::{
    create_default_context, get_next_statuses, get_valid_transitions, is_transition_valid,
    validate_status_transition, Guard, StateTransition,
};
pub use pattern_matcher::PatternMatcher;
pub use risk_factors::detect_risk_factors;
pub use stall_risk::StallRiskAssessor;
pub use velocity_metrics::VelocityCalculator;
