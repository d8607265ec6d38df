//! Deal benchmark: the tunable reference for "normal" negotiation pace.

use serde::{Deserialize, Serialize};

/// Healthy band for proposal throughput.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityRange {
    pub min_proposals_per_day: f64,
    pub max_proposals_per_day: f64,
}

impl Default for VelocityRange {
    fn default() -> Self {
        Self {
            min_proposals_per_day: 0.5,
            max_proposals_per_day: 3.0,
        }
    }
}

/// Thresholds used to interpret raw velocity metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealBenchmark {
    #[serde(default = "default_deal_type")]
    pub deal_type: String,

    /// Mean calendar days from first proposal to close.
    #[serde(default = "default_average_days_to_close")]
    pub average_days_to_close: f64,

    #[serde(default = "default_average_rounds_per_term")]
    pub average_rounds_per_term: f64,

    /// Days of silence before inactivity is flagged at medium severity.
    #[serde(default = "default_inactivity_warning_days")]
    pub inactivity_warning_days: i64,

    /// Days of silence before inactivity is flagged at high severity.
    #[serde(default = "default_inactivity_critical_days")]
    pub inactivity_critical_days: i64,

    #[serde(default)]
    pub healthy_velocity_range: VelocityRange,
}

fn default_deal_type() -> String {
    "syndicated_loan".to_string()
}

const fn default_average_days_to_close() -> f64 {
    45.0
}

const fn default_average_rounds_per_term() -> f64 {
    3.0
}

const fn default_inactivity_warning_days() -> i64 {
    3
}

const fn default_inactivity_critical_days() -> i64 {
    7
}

impl Default for DealBenchmark {
    fn default() -> Self {
        Self {
            deal_type: default_deal_type(),
            average_days_to_close: default_average_days_to_close(),
            average_rounds_per_term: default_average_rounds_per_term(),
            inactivity_warning_days: default_inactivity_warning_days(),
            inactivity_critical_days: default_inactivity_critical_days(),
            healthy_velocity_range: VelocityRange::default(),
        }
    }
}

impl DealBenchmark {
    /// Progress percentage per day of a deal closing in the average time.
    ///
    /// Zero when the benchmark carries no usable close time.
    pub fn historical_velocity(&self) -> f64 {
        if self.average_days_to_close > 0.0 {
            100.0 / self.average_days_to_close
        } else {
            0.0
        }
    }
}
