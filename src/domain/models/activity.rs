//! Activity log and participant engagement models.
//!
//! The activity log is append-only. The engine filters and aggregates events
//! but never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for "this never happened" in day-count fields.
///
/// Distinguishes an empty history from an event that happened today (0 days).
pub const NEVER_DAYS: i64 = 999;

/// Kind of negotiation activity recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEventType {
    /// A party put forward a new proposal or counter-proposal
    ProposalCreated,
    /// A party accepted, rejected, or countered a proposal
    ProposalResponse,
    /// A comment was posted on a term
    CommentAdded,
    /// A term reached agreement
    TermAgreed,
}

impl ActivityEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProposalCreated => "proposal_created",
            Self::ProposalResponse => "proposal_response",
            Self::CommentAdded => "comment_added",
            Self::TermAgreed => "term_agreed",
        }
    }
}

/// A single entry in a deal's activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: String,
    pub deal_id: String,
    pub event_type: ActivityEventType,
    pub actor_id: String,
    pub actor_party: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_category: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    /// Create an event with no term association.
    pub fn new(
        id: impl Into<String>,
        deal_id: impl Into<String>,
        event_type: ActivityEventType,
        actor_id: impl Into<String>,
        actor_party: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            deal_id: deal_id.into(),
            event_type,
            actor_id: actor_id.into(),
            actor_party: actor_party.into(),
            term_id: None,
            term_category: None,
            timestamp,
        }
    }

    /// Attach the term (and its category) this event concerns.
    pub fn for_term(mut self, term_id: impl Into<String>, category: impl Into<String>) -> Self {
        self.term_id = Some(term_id.into());
        self.term_category = Some(category.into());
        self
    }
}

/// Role a participant plays on the deal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealRole {
    /// Runs the negotiation; may reset proposals and lock agreed terms
    DealLead,
    /// Negotiates terms on behalf of a party
    #[default]
    Negotiator,
    /// Signs off on terms
    Approver,
    /// Read-only participant
    Observer,
}

impl DealRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DealLead => "deal_lead",
            Self::Negotiator => "negotiator",
            Self::Approver => "approver",
            Self::Observer => "observer",
        }
    }
}

/// Static facts about a participant, used to derive [`ParticipantEngagement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantProfile {
    pub participant_id: String,
    pub party_name: String,
    /// Free-form party classification, e.g. `borrower`, `lender`, `counsel`.
    pub party_type: String,
    #[serde(default)]
    pub deal_role: DealRole,
}

/// Derived engagement snapshot for one participant.
///
/// Recomputed on demand from the activity log; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEngagement {
    pub participant_id: String,
    pub party_name: String,
    pub party_type: String,
    pub deal_role: DealRole,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub proposals_created: u32,
    #[serde(default)]
    pub proposals_responded: u32,
    #[serde(default)]
    pub comments_added: u32,
    /// Range: 0.0 to 100.0.
    #[serde(default)]
    pub engagement_score: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default = "default_days_since")]
    pub days_since_last_activity: i64,
}

const fn default_days_since() -> i64 {
    NEVER_DAYS
}

impl ParticipantEngagement {
    /// Engagement row for a participant with no recorded activity.
    pub fn idle(profile: &ParticipantProfile) -> Self {
        Self {
            participant_id: profile.participant_id.clone(),
            party_name: profile.party_name.clone(),
            party_type: profile.party_type.clone(),
            deal_role: profile.deal_role,
            last_activity_at: None,
            proposals_created: 0,
            proposals_responded: 0,
            comments_added: 0,
            engagement_score: 0.0,
            is_active: false,
            days_since_last_activity: NEVER_DAYS,
        }
    }

    pub fn is_deal_lead(&self) -> bool {
        self.deal_role == DealRole::DealLead
    }
}
