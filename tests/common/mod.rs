//! Common test utilities for integration tests
//!
//! Shared fixtures for building activity logs and participant rows against a
//! fixed reference instant.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use dealpulse::domain::models::{
    ActivityEvent, ActivityEventType, DealRole, ParticipantEngagement, NEVER_DAYS,
};

pub const DEAL_ID: &str = "deal-42";

/// The instant every fixture is measured against.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Event of `event_type` by `actor` that happened `minutes_ago` before [`now`].
pub fn event(
    n: usize,
    event_type: ActivityEventType,
    actor: &str,
    minutes_ago: i64,
) -> ActivityEvent {
    ActivityEvent::new(
        format!("evt-{n}"),
        DEAL_ID,
        event_type,
        actor,
        "Lender A",
        now() - Duration::minutes(minutes_ago),
    )
}

/// Participant row last active `days_ago` days before [`now`], or never.
pub fn participant(id: &str, role: DealRole, days_ago: Option<i64>) -> ParticipantEngagement {
    let days = days_ago.unwrap_or(NEVER_DAYS);
    ParticipantEngagement {
        participant_id: id.to_string(),
        party_name: format!("Party {id}"),
        party_type: "lender".to_string(),
        deal_role: role,
        last_activity_at: days_ago.map(|d| now() - Duration::days(d)),
        proposals_created: 0,
        proposals_responded: 0,
        comments_added: 0,
        engagement_score: 0.0,
        is_active: days <= 7,
        days_since_last_activity: days,
    }
}

/// Setup test logging
///
/// Initializes a tracing subscriber that writes through the test harness.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
