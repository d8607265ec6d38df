//! Risk factors, pattern matches and the stall-risk assessment report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a detected risk signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorType {
    /// No activity, or throughput has dropped off
    InactivityPeriod,
    /// Few participants are active
    LowEngagement,
    /// A term is circling without converging
    StuckOnTerm,
    /// A key party (the deal lead) has gone quiet
    UnresponsiveParty,
    /// Several covenant terms are contested at once
    CovenantStalemate,
    /// Pricing terms contested with no recent agreements
    PricingDeadlock,
    /// Proposals are going unanswered or rejected
    RejectionStreak,
}

impl RiskFactorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InactivityPeriod => "inactivity_period",
            Self::LowEngagement => "low_engagement",
            Self::StuckOnTerm => "stuck_on_term",
            Self::UnresponsiveParty => "unresponsive_party",
            Self::CovenantStalemate => "covenant_stalemate",
            Self::PricingDeadlock => "pricing_deadlock",
            Self::RejectionStreak => "rejection_streak",
        }
    }
}

/// Severity of a single risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

impl RiskSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Scaling applied to a factor's weight when scoring.
    ///
    /// This is the single source of the severity multiplier table.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.6,
            Self::Low => 0.3,
        }
    }
}

/// A weighted risk signal.
///
/// Factors of the same type may coexist; they are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactor {
    pub factor_type: RiskFactorType,
    pub severity: RiskSeverity,
    /// Range: (0.0, 1.0].
    pub weight: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_term_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_party_id: Option<String>,
    #[serde(default)]
    pub data_points: serde_json::Value,
}

impl RiskFactor {
    pub fn new(
        factor_type: RiskFactorType,
        severity: RiskSeverity,
        weight: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            factor_type,
            severity,
            weight,
            description: description.into(),
            related_term_id: None,
            related_party_id: None,
            data_points: serde_json::Value::Null,
        }
    }

    pub fn with_term(mut self, term_id: impl Into<String>) -> Self {
        self.related_term_id = Some(term_id.into());
        self
    }

    pub fn with_party(mut self, party_id: impl Into<String>) -> Self {
        self.related_party_id = Some(party_id.into());
        self
    }

    pub fn with_data(mut self, data_points: serde_json::Value) -> Self {
        self.data_points = data_points;
        self
    }

    /// Contribution of this factor to the overall risk score, before clamping.
    pub fn score_contribution(&self) -> f64 {
        self.weight * self.severity.multiplier() * 100.0
    }
}

/// Overall risk band derived from the 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::Critical
        } else if score >= 50.0 {
            Self::High
        } else if score >= 30.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

/// How deals matching a historical pattern typically ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    /// Closed on the original timeline
    Closed,
    /// Closed after a material delay
    Delayed,
    /// Stopped progressing for an extended period
    Stalled,
    /// Walked away from
    Abandoned,
}

impl OutcomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Delayed => "delayed",
            Self::Stalled => "stalled",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Similarity between the current deal and one catalog pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPatternMatch {
    pub pattern_id: String,
    pub pattern_name: String,
    /// Range: 0.0 to 1.0.
    pub similarity: f64,
    pub outcome_type: OutcomeType,
    pub historical_close_rate: f64,
    pub average_recovery_days: u32,
    pub key_characteristics: Vec<String>,
}

/// Stall-risk report for a deal. Produced fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StallRiskAssessment {
    pub deal_id: String,
    pub assessment_date: DateTime<Utc>,
    /// Range: 0.0 to 100.0.
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    /// Range: 0.0 to 0.95.
    pub probability_of_stall: f64,
    pub estimated_days_until_stall: Option<u32>,
    pub risk_factors: Vec<RiskFactor>,
    pub matched_patterns: Vec<HistoricalPatternMatch>,
    /// Range: 0.6 to 0.95.
    pub confidence: f64,
}
