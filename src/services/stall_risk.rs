//! Stall-risk scoring stage.
//!
//! Orchestrates risk-factor detection and pattern matching, then folds both
//! into a single [`StallRiskAssessment`]:
//!
//! ```text
//! factor_score  = Σ weight × severity_multiplier × 100
//! pattern_score = top.similarity × (1 − top.historical_close_rate) × 50
//! overall       = min(100, factor_score + pattern_score)
//! ```

use tracing::{debug, instrument};

use crate::domain::models::activity::ParticipantEngagement;
use crate::domain::models::benchmark::DealBenchmark;
use crate::domain::models::pattern::PatternCatalog;
use crate::domain::models::risk::{
    HistoricalPatternMatch, RiskFactor, RiskLevel, StallRiskAssessment,
};
use crate::domain::models::snapshot::DealSnapshot;
use crate::domain::models::terms::CategoryWithTerms;
use crate::domain::models::velocity::{VelocityMetrics, VelocityTrend};
use crate::domain::ports::clock::{Clock, SystemClock};
use crate::domain::ports::stall_horizon::{RandomHorizon, StallHorizon};
use crate::services::engagement::derive_participant_engagement;
use crate::services::pattern_matcher::PatternMatcher;
use crate::services::risk_factors::detect_risk_factors;
use crate::services::velocity_metrics::VelocityCalculator;

pub const MAX_RISK_SCORE: f64 = 100.0;
pub const MAX_STALL_PROBABILITY: f64 = 0.95;
pub const MIN_CONFIDENCE: f64 = 0.6;
pub const MAX_CONFIDENCE: f64 = 0.95;

const PATTERN_SCORE_SCALE: f64 = 50.0;
const DECELERATING_HORIZON_DAYS: i64 = 7;
/// Bounds for the elevated-risk stall horizon draw.
pub const ELEVATED_HORIZON_DAYS: (u32, u32) = (3, 6);

/// Sum of factor contributions.
pub fn factor_score(factors: &[RiskFactor]) -> f64 {
    factors.iter().map(RiskFactor::score_contribution).sum()
}

/// Contribution of the best-matching historical pattern, 0 without matches.
pub fn pattern_score(top_pattern: Option<&HistoricalPatternMatch>) -> f64 {
    top_pattern.map_or(0.0, |p| {
        p.similarity * (1.0 - p.historical_close_rate) * PATTERN_SCORE_SCALE
    })
}

/// Overall risk score, clamped to `[0, 100]`.
pub fn overall_risk_score(
    factors: &[RiskFactor],
    top_pattern: Option<&HistoricalPatternMatch>,
) -> f64 {
    (factor_score(factors) + pattern_score(top_pattern)).clamp(0.0, MAX_RISK_SCORE)
}

pub fn probability_of_stall(overall_risk_score: f64) -> f64 {
    (overall_risk_score / 100.0).clamp(0.0, MAX_STALL_PROBABILITY)
}

/// Predict days until the deal stalls.
///
/// Stalled deals are at 0. Decelerating deals get the remainder of a week
/// since the last activity (at least 1). Other elevated-risk deals draw from
/// [`ELEVATED_HORIZON_DAYS`]. Everything else has no prediction.
pub fn estimate_days_until_stall(
    trend: VelocityTrend,
    days_since_last_activity: i64,
    risk_level: RiskLevel,
    horizon: &dyn StallHorizon,
) -> Option<u32> {
    match trend {
        VelocityTrend::Stalled => Some(0),
        VelocityTrend::Decelerating => {
            let remaining = (DECELERATING_HORIZON_DAYS - days_since_last_activity).max(1);
            Some(u32::try_from(remaining).unwrap_or(u32::MAX))
        }
        VelocityTrend::Accelerating | VelocityTrend::Stable if risk_level.is_elevated() => {
            let (min, max) = ELEVATED_HORIZON_DAYS;
            Some(horizon.sample_days(min, max).clamp(min, max))
        }
        VelocityTrend::Accelerating | VelocityTrend::Stable => None,
    }
}

/// How much the assessment can be trusted given the breadth of its inputs.
pub fn assessment_confidence(participants: usize, categories: usize, risk_factors: usize) -> f64 {
    let coverage = (participants as f64 / 3.0) * 0.3
        + (categories as f64 / 3.0) * 0.3
        + if risk_factors > 0 { 0.4 } else { 0.2 };
    (MIN_CONFIDENCE + coverage.min(1.0) * 0.35).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Service producing stall-risk assessments.
///
/// The clock stamps assessments and drives the metrics stage; the horizon
/// answers the randomized days-until-stall branch.
#[derive(Debug, Clone)]
pub struct StallRiskAssessor<C: Clock = SystemClock, H: StallHorizon = RandomHorizon> {
    velocity: VelocityCalculator<C>,
    horizon: H,
    matcher: PatternMatcher,
}

impl Default for StallRiskAssessor {
    fn default() -> Self {
        Self::new()
    }
}

impl StallRiskAssessor {
    /// Create an assessor with the wall clock, random horizon and built-in catalog.
    pub fn new() -> Self {
        Self {
            velocity: VelocityCalculator::new(),
            horizon: RandomHorizon,
            matcher: PatternMatcher::default(),
        }
    }
}

impl<C: Clock, H: StallHorizon> StallRiskAssessor<C, H> {
    /// Create an assessor from explicit collaborators.
    pub fn with_parts(clock: C, horizon: H, catalog: PatternCatalog) -> Self {
        Self {
            velocity: VelocityCalculator::with_clock(clock),
            horizon,
            matcher: PatternMatcher::new(catalog),
        }
    }

    pub fn velocity_calculator(&self) -> &VelocityCalculator<C> {
        &self.velocity
    }

    /// Assess stall risk from precomputed metrics.
    #[instrument(skip_all, fields(deal_id = %deal_id))]
    pub fn assess_stall_risk(
        &self,
        deal_id: &str,
        metrics: &VelocityMetrics,
        participants: &[ParticipantEngagement],
        categories: &[CategoryWithTerms],
        benchmark: &DealBenchmark,
    ) -> StallRiskAssessment {
        let risk_factors = detect_risk_factors(metrics, participants, categories, benchmark);
        let matched_patterns = self
            .matcher
            .match_historical_patterns(metrics, &risk_factors, categories);

        let overall_risk_score = overall_risk_score(&risk_factors, matched_patterns.first());
        let risk_level = RiskLevel::from_score(overall_risk_score);
        let estimated_days_until_stall = estimate_days_until_stall(
            metrics.velocity_trend,
            metrics.days_since_last_activity,
            risk_level,
            &self.horizon,
        );
        let confidence =
            assessment_confidence(participants.len(), categories.len(), risk_factors.len());

        debug!(
            score = overall_risk_score,
            level = risk_level.as_str(),
            factors = risk_factors.len(),
            patterns = matched_patterns.len(),
            "Assessed stall risk"
        );

        StallRiskAssessment {
            deal_id: deal_id.to_string(),
            assessment_date: self.velocity.now(),
            overall_risk_score,
            risk_level,
            probability_of_stall: probability_of_stall(overall_risk_score),
            estimated_days_until_stall,
            risk_factors,
            matched_patterns,
            confidence,
        }
    }

    /// Engagement rows for a snapshot: supplied rows win, otherwise derived from the roster.
    pub fn participants_for(&self, snapshot: &DealSnapshot) -> Vec<ParticipantEngagement> {
        if snapshot.participants.is_empty() {
            derive_participant_engagement(
                &snapshot.roster,
                &snapshot.activities,
                self.velocity.now(),
            )
        } else {
            snapshot.participants.clone()
        }
    }

    /// Metrics for a snapshot.
    pub fn metrics_for(
        &self,
        snapshot: &DealSnapshot,
        participants: &[ParticipantEngagement],
        benchmark: &DealBenchmark,
    ) -> VelocityMetrics {
        let (total_terms, agreed_terms) = snapshot.term_counts();
        self.velocity.compute_metrics(
            &snapshot.deal_id,
            &snapshot.activities,
            participants,
            total_terms,
            agreed_terms,
            benchmark,
        )
    }

    /// Run the whole pipeline on a snapshot: engagement, metrics, then assessment.
    pub fn assess_snapshot(
        &self,
        snapshot: &DealSnapshot,
        benchmark: &DealBenchmark,
    ) -> (VelocityMetrics, StallRiskAssessment) {
        let participants = self.participants_for(snapshot);
        let metrics = self.metrics_for(snapshot, &participants, benchmark);
        let assessment = self.assess_stall_risk(
            &snapshot.deal_id,
            &metrics,
            &participants,
            &snapshot.categories,
            benchmark,
        );
        (metrics, assessment)
    }
}
