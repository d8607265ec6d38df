//! Negotiation state machine.
//!
//! A static transition table keyed by the current [`NegotiationStatus`]. Each
//! entry names a target status and the guards that must all pass for the move
//! to be allowed. The table holds no state; every check is a pure function of
//! `(current, target, context)`.
//!
//! ```text
//! not_started ──▶ proposed ──▶ under_discussion ──▶ pending_approval ──▶ agreed ──▶ locked
//!      ▲             │ ▲              │  ▲                 │               │
//!      └─────────────┘ └──────────────┘  └─────────────────┘◀──────────────┘
//! ```

use tracing::debug;

use crate::domain::error::{NegotiationError, NegotiationResult};
use crate::domain::models::negotiation::{
    NegotiationMode, NegotiationStatus, StatusInfo, TransitionContext, TransitionResult,
};

/// A named precondition on a transition.
///
/// The description doubles as the rejection reason when the guard fails.
#[derive(Debug, Clone, Copy)]
pub struct Guard {
    pub name: &'static str,
    pub description: &'static str,
    predicate: fn(&TransitionContext) -> bool,
}

impl Guard {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        predicate: fn(&TransitionContext) -> bool,
    ) -> Self {
        Self {
            name,
            description,
            predicate,
        }
    }

    pub fn check(&self, context: &TransitionContext) -> bool {
        (self.predicate)(context)
    }
}

impl PartialEq for Guard {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Guard {}

/// Guard catalog. Every guard used by the transition table is declared here.
pub mod guards {
    use super::{Guard, NegotiationMode, TransitionContext};

    fn proposal_based_mode(ctx: &TransitionContext) -> bool {
        ctx.negotiation_mode != NegotiationMode::Collaborative
    }

    fn consent_satisfied(ctx: &TransitionContext) -> bool {
        ctx.all_parties_approved || !ctx.require_unanimous_consent
    }

    fn all_parties_approved(ctx: &TransitionContext) -> bool {
        ctx.all_parties_approved
    }

    fn can_approve(ctx: &TransitionContext) -> bool {
        ctx.can_approve
    }

    fn can_request_approval(ctx: &TransitionContext) -> bool {
        ctx.can_approve || ctx.is_deal_lead
    }

    fn is_deal_lead(ctx: &TransitionContext) -> bool {
        ctx.is_deal_lead
    }

    fn no_pending_proposals(ctx: &TransitionContext) -> bool {
        !ctx.has_pending_proposals
    }

    fn not_locked(ctx: &TransitionContext) -> bool {
        !ctx.is_locked
    }

    pub const PROPOSAL_BASED_MODE: Guard = Guard::new(
        "proposal_based_mode",
        "Approval can only be requested directly in proposal-based mode",
        proposal_based_mode,
    );

    pub const CONSENT_SATISFIED: Guard = Guard::new(
        "consent_satisfied",
        "All parties must approve when unanimous consent is required",
        consent_satisfied,
    );

    pub const ALL_PARTIES_APPROVED: Guard = Guard::new(
        "all_parties_approved",
        "All parties must approve before agreement",
        all_parties_approved,
    );

    pub const CAN_APPROVE: Guard = Guard::new(
        "can_approve",
        "User must have approval permission",
        can_approve,
    );

    pub const CAN_REQUEST_APPROVAL: Guard = Guard::new(
        "can_request_approval",
        "Only approvers or the deal lead can request approval",
        can_request_approval,
    );

    pub const IS_DEAL_LEAD: Guard = Guard::new(
        "is_deal_lead",
        "Only the deal lead can perform this transition",
        is_deal_lead,
    );

    pub const NO_PENDING_PROPOSALS: Guard = Guard::new(
        "no_pending_proposals",
        "Cannot reset a term while proposals are pending",
        no_pending_proposals,
    );

    pub const NOT_LOCKED: Guard = Guard::new("not_locked", "Term must not be locked", not_locked);
}

/// An allowed move out of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub to: NegotiationStatus,
    pub guards: &'static [Guard],
    pub description: &'static str,
}

const FROM_NOT_STARTED: &[StateTransition] = &[StateTransition {
    to: NegotiationStatus::Proposed,
    guards: &[],
    description: "Open negotiation with an initial proposal",
}];

const FROM_PROPOSED: &[StateTransition] = &[
    StateTransition {
        to: NegotiationStatus::UnderDiscussion,
        guards: &[],
        description: "Begin discussing the proposal",
    },
    StateTransition {
        to: NegotiationStatus::PendingApproval,
        guards: &[guards::PROPOSAL_BASED_MODE],
        description: "Send the proposal straight to approval",
    },
    StateTransition {
        to: NegotiationStatus::Agreed,
        guards: &[guards::CONSENT_SATISFIED, guards::CAN_APPROVE],
        description: "Accept the proposal as-is",
    },
    StateTransition {
        to: NegotiationStatus::NotStarted,
        guards: &[guards::IS_DEAL_LEAD],
        description: "Withdraw the proposal",
    },
];

const FROM_UNDER_DISCUSSION: &[StateTransition] = &[
    StateTransition {
        to: NegotiationStatus::PendingApproval,
        guards: &[guards::CAN_REQUEST_APPROVAL],
        description: "Request approval of the discussed wording",
    },
    StateTransition {
        to: NegotiationStatus::Proposed,
        guards: &[],
        description: "Put forward a revised proposal",
    },
    StateTransition {
        to: NegotiationStatus::Agreed,
        guards: &[guards::ALL_PARTIES_APPROVED, guards::CAN_APPROVE],
        description: "Record agreement reached in discussion",
    },
    StateTransition {
        to: NegotiationStatus::NotStarted,
        guards: &[guards::IS_DEAL_LEAD, guards::NO_PENDING_PROPOSALS],
        description: "Reset the term",
    },
];

const FROM_PENDING_APPROVAL: &[StateTransition] = &[
    StateTransition {
        to: NegotiationStatus::Agreed,
        guards: &[guards::CONSENT_SATISFIED, guards::CAN_APPROVE],
        description: "Approve the term",
    },
    StateTransition {
        to: NegotiationStatus::UnderDiscussion,
        guards: &[guards::CAN_APPROVE],
        description: "Send back for further discussion",
    },
    StateTransition {
        to: NegotiationStatus::Proposed,
        guards: &[],
        description: "Replace with a new proposal",
    },
];

const FROM_AGREED: &[StateTransition] = &[
    StateTransition {
        to: NegotiationStatus::Locked,
        guards: &[guards::IS_DEAL_LEAD],
        description: "Lock the agreed term",
    },
    StateTransition {
        to: NegotiationStatus::UnderDiscussion,
        guards: &[guards::NOT_LOCKED, guards::IS_DEAL_LEAD],
        description: "Reopen the term for discussion",
    },
];

/// Every guard referenced by the transition table.
pub fn all_guards() -> &'static [Guard] {
    const ALL: &[Guard] = &[
        guards::PROPOSAL_BASED_MODE,
        guards::CONSENT_SATISFIED,
        guards::ALL_PARTIES_APPROVED,
        guards::CAN_APPROVE,
        guards::CAN_REQUEST_APPROVAL,
        guards::IS_DEAL_LEAD,
        guards::NO_PENDING_PROPOSALS,
        guards::NOT_LOCKED,
    ];
    ALL
}

/// Transitions out of `status`. Empty for `locked`.
pub fn get_valid_transitions(status: NegotiationStatus) -> &'static [StateTransition] {
    match status {
        NegotiationStatus::NotStarted => FROM_NOT_STARTED,
        NegotiationStatus::Proposed => FROM_PROPOSED,
        NegotiationStatus::UnderDiscussion => FROM_UNDER_DISCUSSION,
        NegotiationStatus::PendingApproval => FROM_PENDING_APPROVAL,
        NegotiationStatus::Agreed => FROM_AGREED,
        NegotiationStatus::Locked => &[],
    }
}

/// Target statuses reachable from `status`, ignoring guards.
pub fn get_next_statuses(status: NegotiationStatus) -> Vec<NegotiationStatus> {
    get_valid_transitions(status).iter().map(|t| t.to).collect()
}

/// Check whether `current → target` is allowed under `context`.
///
/// Never fails; the verdict and reason are carried in the result.
pub fn is_transition_valid(
    current: NegotiationStatus,
    target: NegotiationStatus,
    context: &TransitionContext,
) -> TransitionResult {
    if context.is_locked && target != NegotiationStatus::Locked {
        return TransitionResult::rejected("Term is locked and cannot be modified");
    }

    if current == target {
        return TransitionResult::allowed();
    }

    let transitions = get_valid_transitions(current);
    if transitions.is_empty() {
        return TransitionResult::rejected(format!("No transitions allowed from {current}"));
    }

    let Some(transition) = transitions.iter().find(|t| t.to == target) else {
        let allowed = transitions
            .iter()
            .map(|t| t.to.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return TransitionResult::rejected(format!(
            "Cannot transition from {current} to {target}. Allowed transitions: {allowed}"
        ));
    };

    for guard in transition.guards {
        if !guard.check(context) {
            return TransitionResult::rejected(guard.description);
        }
    }

    TransitionResult::allowed()
}

/// Like [`is_transition_valid`], but surfaces rejection as a typed error.
///
/// Does not apply the transition; callers persist the new status themselves.
pub fn validate_status_transition(
    current: NegotiationStatus,
    target: NegotiationStatus,
    context: &TransitionContext,
) -> NegotiationResult<()> {
    let result = is_transition_valid(current, target, context);
    if result.valid {
        return Ok(());
    }

    let reason = result
        .reason
        .unwrap_or_else(|| "Transition not allowed".to_string());
    debug!(%current, %target, %reason, "Rejected status transition");
    Err(NegotiationError::InvalidTransition {
        current,
        target,
        reason,
    })
}

/// Least-privileged context; override fields with the `with_*` builders.
pub fn create_default_context() -> TransitionContext {
    TransitionContext::default()
}

pub fn get_status_label(status: NegotiationStatus) -> &'static str {
    status.label()
}

pub fn get_status_description(status: NegotiationStatus) -> &'static str {
    status.description()
}

pub fn get_status_priority(status: NegotiationStatus) -> u8 {
    status.priority()
}

pub fn is_term_finalized(status: NegotiationStatus) -> bool {
    status.is_finalized()
}

pub fn is_term_in_negotiation(status: NegotiationStatus) -> bool {
    status.is_in_negotiation()
}

pub fn status_info(status: NegotiationStatus) -> StatusInfo {
    StatusInfo::from(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use NegotiationStatus::*;

    fn valid(from: NegotiationStatus, to: NegotiationStatus, ctx: &TransitionContext) -> bool {
        is_transition_valid(from, to, ctx).valid
    }

    fn permissive() -> TransitionContext {
        create_default_context()
            .with_deal_lead(true)
            .with_can_approve(true)
            .with_all_parties_approved(true)
            .with_mode(NegotiationMode::ProposalBased)
    }

    #[test]
    fn test_not_started_to_proposed_always_allowed() {
        let result = is_transition_valid(NotStarted, Proposed, &create_default_context());
        assert!(result.valid);
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_same_state_is_noop() {
        for status in NegotiationStatus::ALL {
            assert!(valid(status, status, &create_default_context()));
        }
    }

    #[test]
    fn test_locked_context_beats_same_state() {
        let ctx = create_default_context().with_locked(true);
        let result = is_transition_valid(Agreed, Agreed, &ctx);
        assert!(!result.valid);
        assert_eq!(
            result.reason.as_deref(),
            Some("Term is locked and cannot be modified")
        );
        assert!(valid(Locked, Locked, &ctx));
    }

    #[test]
    fn test_locked_context_still_allows_locking() {
        let ctx = create_default_context().with_locked(true).with_deal_lead(true);
        assert!(valid(Agreed, Locked, &ctx));
    }

    #[test]
    fn test_locked_context_rejects_listed_edges() {
        let ctx = permissive().with_locked(true);
        let result = is_transition_valid(Proposed, UnderDiscussion, &ctx);
        assert!(!result.valid);
        assert_eq!(
            result.reason.as_deref(),
            Some("Term is locked and cannot be modified")
        );
        assert!(!valid(PendingApproval, Agreed, &ctx));
    }

    #[test]
    fn test_locked_has_no_transitions() {
        assert!(get_valid_transitions(Locked).is_empty());
        let result = is_transition_valid(Locked, Agreed, &permissive());
        assert!(!result.valid);
        assert_eq!(result.reason.as_deref(), Some("No transitions allowed from locked"));
    }

    #[test]
    fn test_unknown_edge_lists_allowed_targets() {
        let result = is_transition_valid(NotStarted, Agreed, &permissive());
        assert!(!result.valid);
        let reason = result.reason.unwrap();
        assert!(reason.contains("Cannot transition from not_started to agreed"));
        assert!(reason.contains("proposed"));
    }

    #[test]
    fn test_proposed_to_pending_approval_requires_proposal_mode() {
        let collaborative = create_default_context();
        let result = is_transition_valid(Proposed, PendingApproval, &collaborative);
        assert!(!result.valid);
        assert_eq!(result.reason.as_deref(), Some(guards::PROPOSAL_BASED_MODE.description));

        let proposal_based = collaborative.with_mode(NegotiationMode::ProposalBased);
        assert!(valid(Proposed, PendingApproval, &proposal_based));
    }

    #[test]
    fn test_proposed_to_agreed_consent_rules() {
        let base = create_default_context().with_can_approve(true);
        // Unanimity required and not reached
        assert!(!valid(Proposed, Agreed, &base));
        // Unanimity waived
        assert!(valid(Proposed, Agreed, &base.with_unanimous_consent(false)));
        // Unanimity reached
        assert!(valid(Proposed, Agreed, &base.with_all_parties_approved(true)));
        // No approval right
        let no_approver = base.with_all_parties_approved(true).with_can_approve(false);
        let result = is_transition_valid(Proposed, Agreed, &no_approver);
        assert_eq!(result.reason.as_deref(), Some(guards::CAN_APPROVE.description));
    }

    #[test]
    fn test_guards_evaluated_in_order() {
        // Both guards fail; the first one's description is reported.
        let ctx = create_default_context().with_pending_proposals(true);
        let result = is_transition_valid(UnderDiscussion, NotStarted, &ctx);
        assert_eq!(result.reason.as_deref(), Some(guards::IS_DEAL_LEAD.description));

        let lead = create_default_context().with_deal_lead(true).with_pending_proposals(true);
        let result = is_transition_valid(UnderDiscussion, NotStarted, &lead);
        assert_eq!(result.reason.as_deref(), Some(guards::NO_PENDING_PROPOSALS.description));

        assert!(valid(UnderDiscussion, NotStarted, &lead.with_pending_proposals(false)));
    }

    #[test]
    fn test_under_discussion_to_pending_approval_accepts_either_role() {
        let ctx = create_default_context();
        assert!(!valid(UnderDiscussion, PendingApproval, &ctx));
        assert!(valid(UnderDiscussion, PendingApproval, &ctx.with_can_approve(true)));
        assert!(valid(UnderDiscussion, PendingApproval, &ctx.with_deal_lead(true)));
    }

    #[test]
    fn test_under_discussion_to_agreed_ignores_consent_waiver() {
        let ctx = create_default_context()
            .with_can_approve(true)
            .with_unanimous_consent(false);
        let result = is_transition_valid(UnderDiscussion, Agreed, &ctx);
        assert_eq!(result.reason.as_deref(), Some(guards::ALL_PARTIES_APPROVED.description));
        assert!(valid(UnderDiscussion, Agreed, &ctx.with_all_parties_approved(true)));
    }

    #[test]
    fn test_pending_approval_to_agreed_consent_rules() {
        let base = create_default_context().with_can_approve(true);
        let result = is_transition_valid(PendingApproval, Agreed, &base);
        assert_eq!(result.reason.as_deref(), Some(guards::CONSENT_SATISFIED.description));
        assert!(valid(PendingApproval, Agreed, &base.with_unanimous_consent(false)));
        assert!(valid(PendingApproval, Agreed, &base.with_all_parties_approved(true)));

        let waived = base.with_unanimous_consent(false).with_can_approve(false);
        let result = is_transition_valid(PendingApproval, Agreed, &waived);
        assert_eq!(result.reason.as_deref(), Some(guards::CAN_APPROVE.description));
    }

    #[test]
    fn test_pending_approval_send_back_requires_approver() {
        let ctx = create_default_context();
        assert!(!valid(PendingApproval, UnderDiscussion, &ctx));
        assert!(valid(PendingApproval, UnderDiscussion, &ctx.with_can_approve(true)));
        assert!(valid(PendingApproval, Proposed, &ctx));
    }

    #[test]
    fn test_agreed_transitions_require_deal_lead() {
        let ctx = create_default_context();
        assert!(!valid(Agreed, Locked, &ctx));
        assert!(!valid(Agreed, UnderDiscussion, &ctx));
        let lead = ctx.with_deal_lead(true);
        assert!(valid(Agreed, Locked, &lead));
        assert!(valid(Agreed, UnderDiscussion, &lead));
    }

    #[test]
    fn test_next_statuses_match_table() {
        assert_eq!(get_next_statuses(NotStarted), vec![Proposed]);
        assert_eq!(
            get_next_statuses(Proposed),
            vec![UnderDiscussion, PendingApproval, Agreed, NotStarted]
        );
        assert_eq!(
            get_next_statuses(UnderDiscussion),
            vec![PendingApproval, Proposed, Agreed, NotStarted]
        );
        assert_eq!(get_next_statuses(PendingApproval), vec![Agreed, UnderDiscussion, Proposed]);
        assert_eq!(get_next_statuses(Agreed), vec![Locked, UnderDiscussion]);
        assert!(get_next_statuses(Locked).is_empty());
    }

    #[test]
    fn test_every_next_status_valid_under_permissive_context() {
        let ctx = permissive();
        for status in NegotiationStatus::ALL {
            for target in get_next_statuses(status) {
                let result = is_transition_valid(status, target, &ctx);
                assert!(result.valid, "{status} -> {target}: {:?}", result.reason);
            }
        }
    }

    #[test]
    fn test_table_only_references_catalog_guards() {
        for status in NegotiationStatus::ALL {
            for transition in get_valid_transitions(status) {
                assert_ne!(transition.to, status);
                for guard in transition.guards {
                    assert!(all_guards().contains(guard), "unlisted guard {}", guard.name);
                }
            }
        }
    }

    #[test]
    fn test_guards_evaluate_independently() {
        let ctx = create_default_context();
        assert!(!guards::IS_DEAL_LEAD.check(&ctx));
        assert!(guards::NO_PENDING_PROPOSALS.check(&ctx));
        assert!(guards::NOT_LOCKED.check(&ctx));
        assert!(!guards::CONSENT_SATISFIED.check(&ctx));
        assert!(guards::CONSENT_SATISFIED.check(&ctx.with_unanimous_consent(false)));
    }

    #[test]
    fn test_validate_status_transition_error() {
        let err = validate_status_transition(Proposed, NotStarted, &create_default_context())
            .unwrap_err();
        assert_eq!(
            err,
            NegotiationError::InvalidTransition {
                current: Proposed,
                target: NotStarted,
                reason: guards::IS_DEAL_LEAD.description.to_string(),
            }
        );
        let ctx = create_default_context();
        assert!(validate_status_transition(NotStarted, Proposed, &ctx).is_ok());
    }

    #[test]
    fn test_status_queries() {
        assert_eq!(get_status_label(PendingApproval), "Pending Approval");
        assert!(get_status_description(Locked).contains("locked"));
        assert_eq!(get_status_priority(Locked), 0);
        assert_eq!(get_status_priority(NotStarted), 5);
        assert!(is_term_finalized(Agreed));
        assert!(!is_term_finalized(PendingApproval));
        assert!(is_term_in_negotiation(UnderDiscussion));
        assert!(!is_term_in_negotiation(Locked));

        let info = status_info(Agreed);
        assert_eq!(info.label, "Agreed");
        assert!(info.finalized);
        assert!(!info.in_negotiation);
    }
}
