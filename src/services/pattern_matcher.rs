//! Historical pattern matching stage.
//!
//! Each catalog pattern is scored by a small weighted checklist over the risk
//! factors, velocity signals and term counts of the current deal. The score is
//! normalized by the checklist's maximum so similarity lands in `[0, 1]`.

use std::cmp::Ordering;
use tracing::debug;

use crate::domain::models::pattern::{HistoricalPattern, PatternCatalog, PatternSignature};
use crate::domain::models::risk::{HistoricalPatternMatch, RiskFactor, RiskFactorType};
use crate::domain::models::terms::CategoryWithTerms;
use crate::domain::models::velocity::{EngagementTrend, VelocityMetrics, VelocityTrend};

/// Matches below this similarity are dropped.
pub const MIN_SIMILARITY: f64 = 0.5;

// Absorbs rounding in summed checklist weights at the threshold.
const SIMILARITY_TOLERANCE: f64 = 1e-9;

/// Accumulates weighted boolean checks.
#[derive(Debug, Default, Clone, Copy)]
struct Checklist {
    score: f64,
    max: f64,
}

impl Checklist {
    fn check(mut self, condition: bool, weight: f64) -> Self {
        self.max += weight;
        if condition {
            self.score += weight;
        }
        self
    }

    /// Check with a graded weight; the maximum counts the largest grade.
    fn graded(mut self, earned: f64, max_weight: f64) -> Self {
        self.max += max_weight;
        self.score += earned.clamp(0.0, max_weight);
        self
    }

    fn similarity(self) -> f64 {
        if self.max > 0.0 {
            (self.score / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Signals extracted once per assessment and shared by every pattern formula.
struct Signals<'a> {
    metrics: &'a VelocityMetrics,
    factors: &'a [RiskFactor],
    open_terms: usize,
}

impl Signals<'_> {
    fn has(&self, factor_type: RiskFactorType) -> bool {
        self.factors.iter().any(|f| f.factor_type == factor_type)
    }
}

fn similarity(signature: PatternSignature, s: &Signals<'_>) -> f64 {
    let m = s.metrics;
    let checklist = Checklist::default();

    let checklist = match signature {
        PatternSignature::CovenantDeadlock => checklist
            .check(s.has(RiskFactorType::CovenantStalemate), 0.5)
            .check(s.has(RiskFactorType::StuckOnTerm), 0.3)
            .check(m.velocity_trend.is_declining(), 0.2),
        PatternSignature::PricingStandoff => checklist
            .check(s.has(RiskFactorType::PricingDeadlock), 0.5)
            .check(s.has(RiskFactorType::RejectionStreak), 0.3)
            .check(m.days_since_last_agreement >= 7, 0.2),
        PatternSignature::ParticipantDropout => checklist
            .check(s.has(RiskFactorType::UnresponsiveParty), 0.4)
            .check(s.has(RiskFactorType::LowEngagement), 0.4)
            .check(m.engagement_trend == EngagementTrend::Decreasing, 0.2),
        PatternSignature::VelocityDecline => {
            let trend = match m.velocity_trend {
                VelocityTrend::Stalled => 0.5,
                VelocityTrend::Decelerating => 0.35,
                VelocityTrend::Accelerating | VelocityTrend::Stable => 0.0,
            };
            checklist
                .graded(trend, 0.5)
                .check(s.has(RiskFactorType::InactivityPeriod), 0.3)
                .check(m.compared_to_historical_average < 0.5, 0.2)
        }
        PatternSignature::DeadlinePressure => checklist
            .check(s.open_terms >= 3, 0.4)
            .check(m.proposals_per_day >= 1.0, 0.3)
            .check(m.estimated_days_to_completion.is_none_or(|d| d > 30), 0.3),
        PatternSignature::MomentumLoss => checklist
            .check(m.has_agreements() && m.days_since_last_agreement >= 7, 0.4)
            .check(m.engagement_trend == EngagementTrend::Decreasing, 0.3)
            .check(m.velocity_trend.is_declining(), 0.3),
    };

    checklist.similarity()
}

fn to_match(pattern: &HistoricalPattern, similarity: f64) -> HistoricalPatternMatch {
    HistoricalPatternMatch {
        pattern_id: pattern.id.clone(),
        pattern_name: pattern.name.clone(),
        similarity,
        outcome_type: pattern.outcome_type,
        historical_close_rate: pattern.historical_close_rate,
        average_recovery_days: pattern.average_recovery_days,
        key_characteristics: pattern.key_characteristics.clone(),
    }
}

/// Service scoring a deal against a pattern catalog.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    catalog: PatternCatalog,
}

impl PatternMatcher {
    pub fn new(catalog: PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Patterns with similarity of at least [`MIN_SIMILARITY`], most similar first.
    ///
    /// Ties keep catalog order.
    pub fn match_historical_patterns(
        &self,
        metrics: &VelocityMetrics,
        risk_factors: &[RiskFactor],
        categories: &[CategoryWithTerms],
    ) -> Vec<HistoricalPatternMatch> {
        let signals = Signals {
            metrics,
            factors: risk_factors,
            open_terms: categories
                .iter()
                .flat_map(|c| c.terms.iter())
                .filter(|t| t.negotiation_status.is_in_negotiation())
                .count(),
        };

        let mut matches: Vec<HistoricalPatternMatch> = self
            .catalog
            .patterns
            .iter()
            .map(|pattern| (pattern, similarity(pattern.signature, &signals)))
            .filter(|(_, sim)| *sim + SIMILARITY_TOLERANCE >= MIN_SIMILARITY)
            .map(|(pattern, sim)| to_match(pattern, sim))
            .collect();

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });

        debug!(
            deal_id = %metrics.deal_id,
            matched = matches.len(),
            top = matches.first().map(|m| m.pattern_id.as_str()),
            "Matched historical patterns"
        );

        matches
    }
}
