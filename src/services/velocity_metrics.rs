//! Velocity metrics stage.
//!
//! Turns a raw activity log into rates, recency, progress and trend signals.
//! All time math is relative to the injected [`Clock`].

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::domain::models::activity::{
    ActivityEvent, ActivityEventType, ParticipantEngagement, NEVER_DAYS,
};
use crate::domain::models::benchmark::DealBenchmark;
use crate::domain::models::velocity::{EngagementTrend, VelocityMetrics, VelocityTrend};
use crate::domain::ports::clock::{Clock, SystemClock};
use crate::services::engagement::{days_between, ACTIVE_WINDOW_DAYS};

const RATE_WINDOW_DAYS: i64 = 7;
const RECENT_ENGAGEMENT_DAYS: i64 = 3;

const ACCELERATING_RATIO: f64 = 1.2;
const DECELERATING_RATIO: f64 = 0.7;
const ENGAGEMENT_INCREASING_RATIO: f64 = 0.8;
const ENGAGEMENT_DECREASING_RATIO: f64 = 0.4;

/// Activity log split by event type, each partition newest first.
#[derive(Debug, Default)]
struct Partitions<'a> {
    proposals: Vec<&'a ActivityEvent>,
    comments: Vec<&'a ActivityEvent>,
    agreements: Vec<&'a ActivityEvent>,
    responses: Vec<&'a ActivityEvent>,
}

impl<'a> Partitions<'a> {
    fn split(activities: &[&'a ActivityEvent]) -> Self {
        let mut parts = Self::default();
        for &event in activities {
            match event.event_type {
                ActivityEventType::ProposalCreated => parts.proposals.push(event),
                ActivityEventType::CommentAdded => parts.comments.push(event),
                ActivityEventType::TermAgreed => parts.agreements.push(event),
                ActivityEventType::ProposalResponse => parts.responses.push(event),
            }
        }
        for part in [
            &mut parts.proposals,
            &mut parts.comments,
            &mut parts.agreements,
            &mut parts.responses,
        ] {
            part.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }
        parts
    }
}

/// Days since the newest event in a newest-first partition, or the 999 sentinel.
fn days_since_latest(events: &[&ActivityEvent], now: DateTime<Utc>) -> i64 {
    events
        .first()
        .map_or(NEVER_DAYS, |e| days_between(e.timestamp, now))
}

fn count_between<'a>(
    events: impl IntoIterator<Item = &'a ActivityEvent>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> usize {
    events
        .into_iter()
        .filter(|e| e.timestamp >= from && e.timestamp <= to)
        .count()
}

fn weekly_rate(events: &[&ActivityEvent], now: DateTime<Utc>) -> f64 {
    let since = now - Duration::days(RATE_WINDOW_DAYS);
    count_between(events.iter().copied(), since, now) as f64 / RATE_WINDOW_DAYS as f64
}

/// Classify the velocity trend from event counts in consecutive 7-day windows.
pub fn classify_velocity_trend(
    last_week: usize,
    previous_week: usize,
    benchmark: &DealBenchmark,
) -> VelocityTrend {
    if last_week == 0 {
        return VelocityTrend::Stalled;
    }

    let daily_average = last_week as f64 / RATE_WINDOW_DAYS as f64;
    if daily_average < benchmark.healthy_velocity_range.min_proposals_per_day {
        return VelocityTrend::Decelerating;
    }

    if previous_week == 0 {
        return VelocityTrend::Accelerating;
    }

    let ratio = last_week as f64 / previous_week as f64;
    if ratio > ACCELERATING_RATIO {
        VelocityTrend::Accelerating
    } else if ratio < DECELERATING_RATIO {
        VelocityTrend::Decelerating
    } else {
        VelocityTrend::Stable
    }
}

/// Classify engagement from the share of participants active in the last 3 days.
pub fn classify_engagement_trend(participants: &[ParticipantEngagement]) -> EngagementTrend {
    if participants.is_empty() {
        return EngagementTrend::Stable;
    }

    let recent = participants
        .iter()
        .filter(|p| p.days_since_last_activity <= RECENT_ENGAGEMENT_DAYS)
        .count();
    let ratio = recent as f64 / participants.len() as f64;

    if ratio >= ENGAGEMENT_INCREASING_RATIO {
        EngagementTrend::Increasing
    } else if ratio <= ENGAGEMENT_DECREASING_RATIO {
        EngagementTrend::Decreasing
    } else {
        EngagementTrend::Stable
    }
}

/// Percentage of participants active within the last 7 days.
pub fn participant_engagement_rate(participants: &[ParticipantEngagement]) -> f64 {
    if participants.is_empty() {
        return 0.0;
    }
    let active = participants
        .iter()
        .filter(|p| p.days_since_last_activity <= ACTIVE_WINDOW_DAYS)
        .count();
    active as f64 / participants.len() as f64 * 100.0
}

/// Service computing [`VelocityMetrics`] against an injected clock.
#[derive(Debug, Clone, Default)]
pub struct VelocityCalculator<C: Clock = SystemClock> {
    clock: C,
}

impl VelocityCalculator<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> VelocityCalculator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Compute the velocity snapshot for a deal.
    ///
    /// # Arguments
    /// * `activities` - The deal's activity log, in any order; events after `now` are ignored
    /// * `participants` - Engagement rows for everyone on the deal
    /// * `total_terms` / `agreed_terms` - Progress counts
    /// * `benchmark` - Thresholds for trend classification and comparison
    pub fn compute_metrics(
        &self,
        deal_id: &str,
        activities: &[ActivityEvent],
        participants: &[ParticipantEngagement],
        total_terms: u32,
        agreed_terms: u32,
        benchmark: &DealBenchmark,
    ) -> VelocityMetrics {
        let now = self.clock.now();
        // Events stamped after the clock have not happened yet.
        let observed: Vec<&ActivityEvent> =
            activities.iter().filter(|e| e.timestamp <= now).collect();
        let parts = Partitions::split(&observed);

        let newest = observed.iter().map(|e| e.timestamp).max();
        let oldest = observed.iter().map(|e| e.timestamp).min();

        let days_since_last_activity = newest.map_or(NEVER_DAYS, |t| days_between(t, now));
        let days_since_last_proposal = days_since_latest(&parts.proposals, now);
        let days_since_last_agreement = days_since_latest(&parts.agreements, now);

        let proposals_per_day = weekly_rate(&parts.proposals, now);
        let comments_per_day = weekly_rate(&parts.comments, now);
        let agreed_terms_per_day = weekly_rate(&parts.agreements, now);

        let response_rate_to_proposals = if parts.proposals.is_empty() {
            100.0
        } else {
            parts.responses.len() as f64 / parts.proposals.len() as f64 * 100.0
        };

        let deal_age_days = oldest.map_or(1, |t| days_between(t, now).max(1));
        let progress = if total_terms == 0 {
            0.0
        } else {
            (f64::from(agreed_terms) / f64::from(total_terms) * 100.0).min(100.0)
        };
        let progress_velocity = progress / deal_age_days as f64;
        let estimated_days_to_completion = if progress_velocity > 0.0 {
            Some((((100.0 - progress) / progress_velocity).ceil() as i64).max(0))
        } else {
            None
        };

        let last_week_start = now - Duration::days(RATE_WINDOW_DAYS);
        let previous_week_start = last_week_start - Duration::days(RATE_WINDOW_DAYS);
        let last_week = count_between(observed.iter().copied(), last_week_start, now);
        let previous_week = observed
            .iter()
            .filter(|e| e.timestamp >= previous_week_start && e.timestamp < last_week_start)
            .count();

        let velocity_trend = classify_velocity_trend(last_week, previous_week, benchmark);
        let engagement_trend = classify_engagement_trend(participants);

        let historical_velocity = benchmark.historical_velocity();
        let compared_to_historical_average = if historical_velocity > 0.0 {
            progress_velocity / historical_velocity
        } else {
            1.0
        };

        let metrics = VelocityMetrics {
            deal_id: deal_id.to_string(),
            calculated_at: now,
            proposals_per_day,
            comments_per_day,
            agreed_terms_per_day,
            days_since_last_activity,
            days_since_last_proposal,
            days_since_last_agreement,
            participant_engagement_rate: participant_engagement_rate(participants),
            response_rate_to_proposals,
            progress_velocity,
            estimated_days_to_completion,
            velocity_trend,
            engagement_trend,
            compared_to_historical_average,
        };

        debug!(
            deal_id,
            events = observed.len(),
            last_week,
            previous_week,
            trend = metrics.velocity_trend.as_str(),
            engagement = metrics.engagement_trend.as_str(),
            "Computed velocity metrics"
        );

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::activity::DealRole;
    use crate::domain::ports::clock::FixedClock;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn calculator() -> VelocityCalculator<FixedClock> {
        VelocityCalculator::with_clock(FixedClock::new(now()))
    }

    fn compute(activities: &[ActivityEvent], total: u32, agreed: u32) -> VelocityMetrics {
        calculator().compute_metrics("d", activities, &[], total, agreed, &DealBenchmark::default())
    }

    fn event_at(kind: ActivityEventType, at: DateTime<Utc>) -> ActivityEvent {
        ActivityEvent::new("e", "deal-1", kind, "u1", "Lender", at)
    }

    fn event(kind: ActivityEventType, days_ago: i64) -> ActivityEvent {
        event_at(kind, now() - Duration::days(days_ago))
    }

    fn participant(days: i64) -> ParticipantEngagement {
        ParticipantEngagement {
            participant_id: format!("p{days}"),
            party_name: "Party".to_string(),
            party_type: "lender".to_string(),
            deal_role: DealRole::Negotiator,
            last_activity_at: None,
            proposals_created: 0,
            proposals_responded: 0,
            comments_added: 0,
            engagement_score: 0.0,
            is_active: days <= 7,
            days_since_last_activity: days,
        }
    }

    #[test]
    fn test_empty_log_uses_sentinels() {
        let metrics = compute(&[], 0, 0);
        assert_eq!(metrics.days_since_last_activity, NEVER_DAYS);
        assert_eq!(metrics.days_since_last_proposal, NEVER_DAYS);
        assert_eq!(metrics.days_since_last_agreement, NEVER_DAYS);
        assert_eq!(metrics.velocity_trend, VelocityTrend::Stalled);
        assert_eq!(metrics.engagement_trend, EngagementTrend::Stable);
        assert_eq!(metrics.participant_engagement_rate, 0.0);
        assert_eq!(metrics.response_rate_to_proposals, 100.0);
        assert_eq!(metrics.progress_velocity, 0.0);
        assert_eq!(metrics.estimated_days_to_completion, None);
        assert_eq!(metrics.calculated_at, now());
    }

    #[test]
    fn test_recency_by_partition() {
        let activities = vec![
            event(ActivityEventType::ProposalCreated, 4),
            event(ActivityEventType::ProposalCreated, 2),
            event(ActivityEventType::CommentAdded, 1),
            event(ActivityEventType::TermAgreed, 9),
        ];
        let metrics = compute(&activities, 4, 1);
        assert_eq!(metrics.days_since_last_activity, 1);
        assert_eq!(metrics.days_since_last_proposal, 2);
        assert_eq!(metrics.days_since_last_agreement, 9);
    }

    #[test]
    fn test_weekly_rates_ignore_older_events() {
        let activities = vec![
            event(ActivityEventType::ProposalCreated, 1),
            event(ActivityEventType::ProposalCreated, 6),
            event(ActivityEventType::ProposalCreated, 8),
            event(ActivityEventType::CommentAdded, 3),
        ];
        let metrics = compute(&activities, 0, 0);
        assert!((metrics.proposals_per_day - 2.0 / 7.0).abs() < 1e-9);
        assert!((metrics.comments_per_day - 1.0 / 7.0).abs() < 1e-9);
        assert_eq!(metrics.agreed_terms_per_day, 0.0);
    }

    #[test]
    fn test_response_rate() {
        let activities = vec![
            event(ActivityEventType::ProposalCreated, 1),
            event(ActivityEventType::ProposalCreated, 1),
            event(ActivityEventType::ProposalCreated, 1),
            event(ActivityEventType::ProposalCreated, 1),
            event(ActivityEventType::ProposalResponse, 1),
        ];
        let metrics = compute(&activities, 0, 0);
        assert_eq!(metrics.response_rate_to_proposals, 25.0);
    }

    #[test]
    fn test_response_rate_without_proposals_is_full() {
        let activities = vec![
            event(ActivityEventType::ProposalResponse, 1),
            event(ActivityEventType::ProposalResponse, 2),
        ];
        let metrics = compute(&activities, 0, 0);
        assert_eq!(metrics.response_rate_to_proposals, 100.0);
    }

    #[test]
    fn test_progress_velocity_and_completion_estimate() {
        // Deal is 10 days old with 4 of 10 terms agreed: 40% / 10 days = 4%/day
        let activities = vec![
            event(ActivityEventType::ProposalCreated, 10),
            event(ActivityEventType::TermAgreed, 1),
        ];
        let metrics = compute(&activities, 10, 4);
        assert!((metrics.progress_velocity - 4.0).abs() < 1e-9);
        assert_eq!(metrics.estimated_days_to_completion, Some(15));
        let historical = 100.0 / 45.0;
        assert!((metrics.compared_to_historical_average - 4.0 / historical).abs() < 1e-9);
    }

    #[test]
    fn test_progress_caps_when_agreed_exceeds_total() {
        let activities = vec![event(ActivityEventType::TermAgreed, 2)];
        let metrics = compute(&activities, 2, 4);
        assert!((metrics.progress_velocity - 50.0).abs() < 1e-9);
        assert_eq!(metrics.estimated_days_to_completion, Some(0));
        assert!((metrics.compared_to_historical_average - 50.0 / (100.0 / 45.0)).abs() < 1e-9);
    }

    #[test]
    fn test_events_after_now_are_ignored() {
        let activities = vec![
            event_at(ActivityEventType::ProposalCreated, now() + Duration::hours(2)),
            event_at(ActivityEventType::CommentAdded, now() + Duration::days(1)),
        ];
        let metrics = compute(&activities, 0, 0);
        assert_eq!(metrics.days_since_last_activity, NEVER_DAYS);
        assert_eq!(metrics.days_since_last_proposal, NEVER_DAYS);
        assert_eq!(metrics.proposals_per_day, 0.0);
        assert_eq!(metrics.response_rate_to_proposals, 100.0);
        assert_eq!(metrics.velocity_trend, VelocityTrend::Stalled);

        let mut with_past = activities;
        with_past.push(event(ActivityEventType::ProposalCreated, 1));
        let metrics = compute(&with_past, 0, 0);
        assert_eq!(metrics.days_since_last_activity, 1);
        assert!((metrics.proposals_per_day - 1.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_young_deal_age_floors_at_one_day() {
        let activities = vec![event_at(ActivityEventType::TermAgreed, now() - Duration::hours(3))];
        let metrics = compute(&activities, 4, 1);
        assert!((metrics.progress_velocity - 25.0).abs() < 1e-9);
        assert_eq!(metrics.estimated_days_to_completion, Some(3));
    }

    #[test]
    fn test_historical_comparison_defaults_without_benchmark_velocity() {
        let benchmark = DealBenchmark {
            average_days_to_close: 0.0,
            ..DealBenchmark::default()
        };
        let metrics = calculator().compute_metrics("d", &[], &[], 0, 0, &benchmark);
        assert_eq!(metrics.compared_to_historical_average, 1.0);
    }

    #[test]
    fn test_velocity_trend_classification() {
        let benchmark = DealBenchmark::default();
        assert_eq!(classify_velocity_trend(0, 0, &benchmark), VelocityTrend::Stalled);
        assert_eq!(classify_velocity_trend(0, 12, &benchmark), VelocityTrend::Stalled);
        // 3 events / 7 days < 0.5 per day
        assert_eq!(classify_velocity_trend(3, 1, &benchmark), VelocityTrend::Decelerating);
        assert_eq!(classify_velocity_trend(10, 0, &benchmark), VelocityTrend::Accelerating);
        assert_eq!(classify_velocity_trend(13, 10, &benchmark), VelocityTrend::Accelerating);
        assert_eq!(classify_velocity_trend(12, 10, &benchmark), VelocityTrend::Stable);
        assert_eq!(classify_velocity_trend(7, 10, &benchmark), VelocityTrend::Stable);
        assert_eq!(classify_velocity_trend(6, 10, &benchmark), VelocityTrend::Decelerating);
    }

    #[test]
    fn test_engagement_trend_classification() {
        assert_eq!(classify_engagement_trend(&[]), EngagementTrend::Stable);
        let all_recent = vec![participant(0), participant(2), participant(3)];
        assert_eq!(classify_engagement_trend(&all_recent), EngagementTrend::Increasing);
        let mixed = vec![participant(0), participant(5)];
        assert_eq!(classify_engagement_trend(&mixed), EngagementTrend::Stable);
        let stale = vec![participant(1), participant(5), participant(9)];
        assert_eq!(classify_engagement_trend(&stale), EngagementTrend::Decreasing);
    }

    #[test]
    fn test_engagement_rate() {
        assert_eq!(participant_engagement_rate(&[]), 0.0);
        let participants = vec![
            participant(0),
            participant(7),
            participant(8),
            participant(NEVER_DAYS),
        ];
        assert_eq!(participant_engagement_rate(&participants), 50.0);
    }

    #[test]
    fn test_trend_compares_consecutive_weeks() {
        let mut activities: Vec<ActivityEvent> = (0..5)
            .map(|i| event(ActivityEventType::CommentAdded, 8 + i % 5))
            .collect();
        activities.extend((0..20).map(|i| event(ActivityEventType::ProposalCreated, i % 7)));
        let metrics = compute(&activities, 0, 0);
        assert_eq!(metrics.velocity_trend, VelocityTrend::Accelerating);
    }
}
