//! Velocity metrics snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::NEVER_DAYS;

/// Direction of negotiation throughput week over week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityTrend {
    Accelerating,
    Stable,
    Decelerating,
    Stalled,
}

impl VelocityTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accelerating => "accelerating",
            Self::Stable => "stable",
            Self::Decelerating => "decelerating",
            Self::Stalled => "stalled",
        }
    }

    /// Decelerating or stalled.
    pub fn is_declining(&self) -> bool {
        matches!(self, Self::Decelerating | Self::Stalled)
    }
}

/// Direction of participant engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl EngagementTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Stable => "stable",
            Self::Decreasing => "decreasing",
        }
    }
}

/// Point-in-time velocity snapshot for a deal, always computed relative to "now".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityMetrics {
    pub deal_id: String,
    pub calculated_at: DateTime<Utc>,

    /// Proposals per day over the trailing 7 days.
    pub proposals_per_day: f64,
    pub comments_per_day: f64,
    pub agreed_terms_per_day: f64,

    /// Whole days since the most recent event of any type; 999 if none.
    pub days_since_last_activity: i64,
    pub days_since_last_proposal: i64,
    pub days_since_last_agreement: i64,

    /// Percentage (0-100) of participants active in the last 7 days.
    pub participant_engagement_rate: f64,
    /// Responses per proposal as a percentage; 100 when there are no proposals.
    pub response_rate_to_proposals: f64,

    /// Percentage points of agreed terms gained per day of deal age.
    pub progress_velocity: f64,
    pub estimated_days_to_completion: Option<i64>,

    pub velocity_trend: VelocityTrend,
    pub engagement_trend: EngagementTrend,

    /// Own progress velocity divided by the benchmark's historical velocity.
    pub compared_to_historical_average: f64,
}

impl VelocityMetrics {
    /// Whether any agreement has ever been recorded.
    pub fn has_agreements(&self) -> bool {
        self.days_since_last_agreement < NEVER_DAYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_literals() {
        assert_eq!(serde_json::to_string(&VelocityTrend::Stalled).unwrap(), "\"stalled\"");
        assert_eq!(
            serde_json::to_string(&EngagementTrend::Decreasing).unwrap(),
            "\"decreasing\""
        );
    }

    #[test]
    fn test_declining_trends() {
        assert!(VelocityTrend::Stalled.is_declining());
        assert!(VelocityTrend::Decelerating.is_declining());
        assert!(!VelocityTrend::Stable.is_declining());
        assert!(!VelocityTrend::Accelerating.is_declining());
    }
}
