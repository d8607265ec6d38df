//! Negotiation status domain model.
//!
//! Every negotiated term carries exactly one [`NegotiationStatus`]. Movement
//! between statuses is governed by the transition table in
//! [`crate::services::negotiation_state_machine`]; this module only holds the
//! vocabulary and the per-call [`TransitionContext`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a single negotiated term.
///
/// ```text
/// not_started → proposed → under_discussion ⇄ pending_approval → agreed → locked
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    /// No party has opened negotiation on the term
    #[default]
    NotStarted,
    /// A proposal has been put on the table
    Proposed,
    /// Parties are actively exchanging counter-proposals and comments
    UnderDiscussion,
    /// Waiting on approvers to sign off
    PendingApproval,
    /// All required parties agreed to the current wording
    Agreed,
    /// Agreed and frozen by the deal lead
    Locked,
}

impl NegotiationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::NotStarted,
        Self::Proposed,
        Self::UnderDiscussion,
        Self::PendingApproval,
        Self::Agreed,
        Self::Locked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Proposed => "proposed",
            Self::UnderDiscussion => "under_discussion",
            Self::PendingApproval => "pending_approval",
            Self::Agreed => "agreed",
            Self::Locked => "locked",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "not_started" => Some(Self::NotStarted),
            "proposed" => Some(Self::Proposed),
            "under_discussion" => Some(Self::UnderDiscussion),
            "pending_approval" => Some(Self::PendingApproval),
            "agreed" => Some(Self::Agreed),
            "locked" => Some(Self::Locked),
            _ => None,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::Proposed => "Proposed",
            Self::UnderDiscussion => "Under Discussion",
            Self::PendingApproval => "Pending Approval",
            Self::Agreed => "Agreed",
            Self::Locked => "Locked",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NotStarted => "Negotiation has not begun on this term",
            Self::Proposed => "Initial proposal submitted, awaiting response",
            Self::UnderDiscussion => "Parties are actively negotiating this term",
            Self::PendingApproval => "Proposed terms awaiting final approval",
            Self::Agreed => "All parties have agreed to this term",
            Self::Locked => "Term is finalized and locked from further changes",
        }
    }

    /// Display ordering: finalized terms first, untouched terms last.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Locked => 0,
            Self::Agreed => 1,
            Self::PendingApproval => 2,
            Self::UnderDiscussion => 3,
            Self::Proposed => 4,
            Self::NotStarted => 5,
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Agreed | Self::Locked)
    }

    pub fn is_in_negotiation(&self) -> bool {
        matches!(
            self,
            Self::Proposed | Self::UnderDiscussion | Self::PendingApproval
        )
    }
}

impl fmt::Display for NegotiationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How proposals are exchanged on a deal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationMode {
    /// Parties co-edit terms directly
    #[default]
    Collaborative,
    /// Changes go through formal proposals and approval requests
    ProposalBased,
}

impl NegotiationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collaborative => "collaborative",
            Self::ProposalBased => "proposal_based",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "collaborative" => Some(Self::Collaborative),
            "proposal_based" => Some(Self::ProposalBased),
            _ => None,
        }
    }
}

/// Facts about the caller and the term, supplied fresh for every transition check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionContext {
    pub is_deal_lead: bool,
    pub can_approve: bool,
    pub has_pending_proposals: bool,
    pub all_parties_approved: bool,
    pub is_locked: bool,
    pub negotiation_mode: NegotiationMode,
    pub require_unanimous_consent: bool,
}

impl Default for TransitionContext {
    /// Least-privileged context: no roles, nothing approved, collaborative
    /// mode with unanimous consent required.
    fn default() -> Self {
        Self {
            is_deal_lead: false,
            can_approve: false,
            has_pending_proposals: false,
            all_parties_approved: false,
            is_locked: false,
            negotiation_mode: NegotiationMode::Collaborative,
            require_unanimous_consent: true,
        }
    }
}

impl TransitionContext {
    pub fn with_deal_lead(mut self, value: bool) -> Self {
        self.is_deal_lead = value;
        self
    }

    pub fn with_can_approve(mut self, value: bool) -> Self {
        self.can_approve = value;
        self
    }

    pub fn with_pending_proposals(mut self, value: bool) -> Self {
        self.has_pending_proposals = value;
        self
    }

    pub fn with_all_parties_approved(mut self, value: bool) -> Self {
        self.all_parties_approved = value;
        self
    }

    pub fn with_locked(mut self, value: bool) -> Self {
        self.is_locked = value;
        self
    }

    pub fn with_mode(mut self, mode: NegotiationMode) -> Self {
        self.negotiation_mode = mode;
        self
    }

    pub fn with_unanimous_consent(mut self, value: bool) -> Self {
        self.require_unanimous_consent = value;
        self
    }
}

/// Outcome of a transition validity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TransitionResult {
    pub fn allowed() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Display metadata for a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub status: NegotiationStatus,
    pub label: &'static str,
    pub description: &'static str,
    pub priority: u8,
    pub finalized: bool,
    pub in_negotiation: bool,
}

impl From<NegotiationStatus> for StatusInfo {
    fn from(status: NegotiationStatus) -> Self {
        Self {
            status,
            label: status.label(),
            description: status.description(),
            priority: status.priority(),
            finalized: status.is_finalized(),
            in_negotiation: status.is_in_negotiation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_least_advanced() {
        assert_eq!(NegotiationStatus::default(), NegotiationStatus::NotStarted);
        assert_eq!(NegotiationMode::default(), NegotiationMode::Collaborative);
        let ctx = TransitionContext::default();
        assert_eq!(ctx.negotiation_mode, NegotiationMode::Collaborative);
        assert!(ctx.require_unanimous_consent);
    }

    #[test]
    fn test_status_serde_literals() {
        let json = serde_json::to_string(&NegotiationStatus::UnderDiscussion).unwrap();
        assert_eq!(json, "\"under_discussion\"");
        let parsed: NegotiationStatus = serde_json::from_str("\"pending_approval\"").unwrap();
        assert_eq!(parsed, NegotiationStatus::PendingApproval);
    }

    #[test]
    fn test_status_from_str() {
        for status in NegotiationStatus::ALL {
            assert_eq!(NegotiationStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(
            NegotiationStatus::from_str("Under Discussion"),
            Some(NegotiationStatus::UnderDiscussion)
        );
        assert_eq!(NegotiationStatus::from_str("archived"), None);
    }

    #[test]
    fn test_status_priority_ordering() {
        assert_eq!(NegotiationStatus::Locked.priority(), 0);
        assert_eq!(NegotiationStatus::NotStarted.priority(), 5);
        let mut sorted = NegotiationStatus::ALL.to_vec();
        sorted.sort_by_key(NegotiationStatus::priority);
        assert_eq!(sorted.first(), Some(&NegotiationStatus::Locked));
        assert_eq!(sorted.last(), Some(&NegotiationStatus::NotStarted));
    }

    #[test]
    fn test_finalized_and_in_negotiation_are_disjoint() {
        for status in NegotiationStatus::ALL {
            assert!(!(status.is_finalized() && status.is_in_negotiation()));
        }
        assert!(NegotiationStatus::Agreed.is_finalized());
        assert!(NegotiationStatus::Locked.is_finalized());
        assert!(NegotiationStatus::Proposed.is_in_negotiation());
        assert!(!NegotiationStatus::NotStarted.is_in_negotiation());
    }

    #[test]
    fn test_context_wire_names() {
        let ctx = TransitionContext::default()
            .with_deal_lead(true)
            .with_mode(NegotiationMode::ProposalBased);
        let value = serde_json::to_value(ctx).unwrap();
        assert_eq!(value["isDealLead"], true);
        assert_eq!(value["negotiationMode"], "proposal_based");
        assert_eq!(value["requireUnanimousConsent"], true);
    }

    #[test]
    fn test_transition_result_omits_empty_reason() {
        let json = serde_json::to_string(&TransitionResult::allowed()).unwrap();
        assert_eq!(json, r#"{"valid":true}"#);
    }
}
