//! Participant engagement derivation.
//!
//! Engagement rows are never stored: they are rebuilt from the roster and the
//! activity log every time they are needed.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::domain::models::activity::{
    ActivityEvent, ActivityEventType, ParticipantEngagement, ParticipantProfile, NEVER_DAYS,
};

/// Participants who acted within this many days count as active.
pub const ACTIVE_WINDOW_DAYS: i64 = 7;

const MAX_ACTIVITY_POINTS: f64 = 70.0;

/// Whole days elapsed between `then` and `now`, never negative.
pub fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - then).num_days().max(0)
}

/// Score a participant's contribution on a 0-100 scale.
///
/// Volume of activity earns up to 70 points; recency earns up to 30.
pub fn engagement_score(
    proposals_created: u32,
    proposals_responded: u32,
    comments_added: u32,
    days_since_last_activity: i64,
) -> f64 {
    let activity = f64::from(proposals_created) * 10.0
        + f64::from(proposals_responded) * 8.0
        + f64::from(comments_added) * 4.0;

    let recency = match days_since_last_activity {
        d if d <= 1 => 30.0,
        d if d <= 3 => 20.0,
        d if d <= ACTIVE_WINDOW_DAYS => 10.0,
        _ => 0.0,
    };

    (activity.min(MAX_ACTIVITY_POINTS) + recency).clamp(0.0, 100.0)
}

#[derive(Default)]
struct Tally {
    proposals: u32,
    responses: u32,
    comments: u32,
    last_activity: Option<DateTime<Utc>>,
}

/// Build one engagement row per roster entry from the activity log.
///
/// Events by actors not on the roster, or stamped after `now`, are ignored.
/// Roster order is preserved.
pub fn derive_participant_engagement(
    roster: &[ParticipantProfile],
    activities: &[ActivityEvent],
    now: DateTime<Utc>,
) -> Vec<ParticipantEngagement> {
    let mut tallies: HashMap<&str, Tally> = HashMap::new();

    for event in activities.iter().filter(|e| e.timestamp <= now) {
        let tally = tallies.entry(event.actor_id.as_str()).or_default();
        match event.event_type {
            ActivityEventType::ProposalCreated => tally.proposals += 1,
            ActivityEventType::ProposalResponse => tally.responses += 1,
            ActivityEventType::CommentAdded => tally.comments += 1,
            ActivityEventType::TermAgreed => {}
        }
        if tally.last_activity.is_none_or(|last| event.timestamp > last) {
            tally.last_activity = Some(event.timestamp);
        }
    }

    let rows: Vec<ParticipantEngagement> = roster
        .iter()
        .map(|profile| {
            let Some(tally) = tallies.get(profile.participant_id.as_str()) else {
                return ParticipantEngagement::idle(profile);
            };

            let days = tally
                .last_activity
                .map_or(NEVER_DAYS, |last| days_between(last, now));

            ParticipantEngagement {
                participant_id: profile.participant_id.clone(),
                party_name: profile.party_name.clone(),
                party_type: profile.party_type.clone(),
                deal_role: profile.deal_role,
                last_activity_at: tally.last_activity,
                proposals_created: tally.proposals,
                proposals_responded: tally.responses,
                comments_added: tally.comments,
                engagement_score: engagement_score(
                    tally.proposals,
                    tally.responses,
                    tally.comments,
                    days,
                ),
                is_active: days <= ACTIVE_WINDOW_DAYS,
                days_since_last_activity: days,
            }
        })
        .collect();

    debug!(
        participants = rows.len(),
        active = rows.iter().filter(|p| p.is_active).count(),
        "Derived participant engagement"
    );

    rows
}
