//! Historical negotiation pattern catalog.
//!
//! The catalog is reference data: each entry pairs a similarity signature with
//! static outcome statistics taken from past deals. Statistics are used for
//! explanation and for weighting the top match, never for computing similarity.

use serde::{Deserialize, Serialize};

use super::risk::OutcomeType;

/// Which similarity formula a pattern is scored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSignature {
    CovenantDeadlock,
    PricingStandoff,
    ParticipantDropout,
    VelocityDecline,
    DeadlinePressure,
    MomentumLoss,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPattern {
    pub id: String,
    pub name: String,
    pub signature: PatternSignature,
    pub outcome_type: OutcomeType,
    /// Fraction of historical deals showing this pattern that still closed.
    pub historical_close_rate: f64,
    pub average_recovery_days: u32,
    #[serde(default)]
    pub key_characteristics: Vec<String>,
}

impl HistoricalPattern {
    fn builtin(
        id: &str,
        name: &str,
        signature: PatternSignature,
        outcome_type: OutcomeType,
        historical_close_rate: f64,
        average_recovery_days: u32,
        key_characteristics: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            signature,
            outcome_type,
            historical_close_rate,
            average_recovery_days,
            key_characteristics: key_characteristics.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// The set of patterns a deal is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCatalog {
    pub patterns: Vec<HistoricalPattern>,
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self {
            patterns: vec![
                HistoricalPattern::builtin(
                    "covenant-deadlock",
                    "Covenant Deadlock",
                    PatternSignature::CovenantDeadlock,
                    OutcomeType::Stalled,
                    0.40,
                    18,
                    &[
                        "Multiple financial covenants contested simultaneously",
                        "Repeated counter-proposals on leverage and coverage ratios",
                        "Slowing overall negotiation pace",
                    ],
                ),
                HistoricalPattern::builtin(
                    "pricing-standoff",
                    "Pricing Standoff",
                    PatternSignature::PricingStandoff,
                    OutcomeType::Delayed,
                    0.55,
                    12,
                    &[
                        "Margin or fee terms unresolved",
                        "Low acceptance rate on proposals",
                        "No agreements for several days",
                    ],
                ),
                HistoricalPattern::builtin(
                    "participant-dropout",
                    "Participant Dropout",
                    PatternSignature::ParticipantDropout,
                    OutcomeType::Abandoned,
                    0.35,
                    21,
                    &[
                        "Deal lead or key approver unresponsive",
                        "Majority of participants inactive",
                        "Engagement falling week over week",
                    ],
                ),
                HistoricalPattern::builtin(
                    "velocity-decline",
                    "Velocity Decline",
                    PatternSignature::VelocityDecline,
                    OutcomeType::Delayed,
                    0.60,
                    10,
                    &[
                        "Weekly activity dropping",
                        "Extended gaps between events",
                        "Progress well behind comparable deals",
                    ],
                ),
                HistoricalPattern::builtin(
                    "deadline-pressure",
                    "Deadline Pressure",
                    PatternSignature::DeadlinePressure,
                    OutcomeType::Closed,
                    0.75,
                    5,
                    &[
                        "Many terms still open late in the process",
                        "High proposal throughput",
                        "Completion estimate beyond typical close window",
                    ],
                ),
                HistoricalPattern::builtin(
                    "momentum-loss",
                    "Momentum Loss",
                    PatternSignature::MomentumLoss,
                    OutcomeType::Stalled,
                    0.45,
                    14,
                    &[
                        "Early progress followed by a lull",
                        "No term agreed for over a week",
                        "Participants drifting away",
                    ],
                ),
            ],
        }
    }
}

impl PatternCatalog {
    pub fn new(patterns: Vec<HistoricalPattern>) -> Self {
        Self { patterns }
    }

    pub fn get(&self, id: &str) -> Option<&HistoricalPattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
