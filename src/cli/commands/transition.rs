//! `dealpulse transition`: check a term status change against the workflow.

use anyhow::{anyhow, Result};
use clap::Args;

use crate::cli::output::{colorize_status, output, CommandOutput};
use crate::domain::models::{NegotiationMode, NegotiationStatus, TransitionContext};
use crate::services::negotiation_state_machine::{
    get_next_statuses, is_transition_valid, validate_status_transition,
};

#[derive(Args, Debug)]
pub struct TransitionArgs {
    /// Current status
    pub from: String,

    /// Target status
    pub to: String,

    /// Actor is the deal lead
    #[arg(long)]
    pub deal_lead: bool,

    /// Actor may approve terms
    #[arg(long)]
    pub can_approve: bool,

    /// The term has unresolved proposals
    #[arg(long)]
    pub pending_proposals: bool,

    /// Every party has approved the term
    #[arg(long)]
    pub all_approved: bool,

    /// The term is locked
    #[arg(long)]
    pub locked: bool,

    /// Negotiation mode (collaborative, proposal_based)
    #[arg(long, default_value = "collaborative")]
    pub mode: String,

    /// Do not require unanimous consent to agree
    #[arg(long)]
    pub no_unanimous_consent: bool,

    /// Exit with an error when the transition is rejected
    #[arg(long)]
    pub strict: bool,
}

impl TransitionArgs {
    fn context(&self) -> Result<TransitionContext> {
        let mode = NegotiationMode::from_str(&self.mode)
            .ok_or_else(|| anyhow!("Invalid negotiation mode: {}", self.mode))?;
        Ok(TransitionContext::default()
            .with_deal_lead(self.deal_lead)
            .with_can_approve(self.can_approve)
            .with_pending_proposals(self.pending_proposals)
            .with_all_parties_approved(self.all_approved)
            .with_locked(self.locked)
            .with_mode(mode)
            .with_unanimous_consent(!self.no_unanimous_consent))
    }
}

fn parse_status(value: &str) -> Result<NegotiationStatus> {
    NegotiationStatus::from_str(value).ok_or_else(|| {
        let known = NegotiationStatus::ALL
            .iter()
            .map(NegotiationStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("Invalid status: {value}. Expected one of: {known}")
    })
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutput {
    pub from: NegotiationStatus,
    pub to: NegotiationStatus,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub next_statuses: Vec<NegotiationStatus>,
}

impl CommandOutput for TransitionOutput {
    fn to_human(&self) -> String {
        let verdict = if self.valid { "allowed" } else { "rejected" };
        let mut lines = vec![format!(
            "{} -> {}: {}",
            colorize_status(self.from.as_str()),
            colorize_status(self.to.as_str()),
            verdict
        )];
        if let Some(reason) = &self.reason {
            lines.push(format!("Reason: {reason}"));
        }
        let next = if self.next_statuses.is_empty() {
            "none".to_string()
        } else {
            self.next_statuses
                .iter()
                .map(NegotiationStatus::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(format!("Reachable from {}: {next}", self.from));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: TransitionArgs, json_mode: bool) -> Result<()> {
    let from = parse_status(&args.from)?;
    let to = parse_status(&args.to)?;
    let context = args.context()?;

    if args.strict {
        validate_status_transition(from, to, &context)?;
    }

    let result = is_transition_valid(from, to, &context);
    let out = TransitionOutput {
        from,
        to,
        valid: result.valid,
        reason: result.reason,
        next_statuses: get_next_statuses(from),
    };
    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: TransitionArgs,
    }

    fn args(argv: &[&str]) -> TransitionArgs {
        let mut full = vec!["transition"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_context_from_flags() {
        let ctx = args(&[
            "agreed",
            "locked",
            "--deal-lead",
            "--mode",
            "proposal_based",
            "--no-unanimous-consent",
        ])
        .context()
        .unwrap();
        assert!(ctx.is_deal_lead);
        assert!(!ctx.can_approve);
        assert_eq!(ctx.negotiation_mode, NegotiationMode::ProposalBased);
        assert!(!ctx.require_unanimous_consent);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(args(&["agreed", "locked", "--mode", "solo"]).context().is_err());
    }

    #[test]
    fn test_parse_status_lists_known_values() {
        assert_eq!(parse_status("pending_approval").unwrap(), NegotiationStatus::PendingApproval);
        let err = parse_status("done").unwrap_err().to_string();
        assert!(err.contains("not_started"));
    }

    #[test]
    fn test_strict_mode_surfaces_rejection() {
        let err = execute(args(&["agreed", "locked", "--strict"]), true).unwrap_err();
        assert!(err.to_string().contains("Invalid status transition from agreed to locked"));

        assert!(execute(args(&["agreed", "locked", "--deal-lead", "--strict"]), true).is_ok());
    }
}
