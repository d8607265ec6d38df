//! `dealpulse statuses`: the negotiation workflow as a table.

use anyhow::Result;
use clap::Args;

use crate::cli::output::{colorize_status, list_table, output, CommandOutput};
use crate::domain::models::{NegotiationStatus, StatusInfo};
use crate::services::negotiation_state_machine::{all_guards, get_next_statuses, status_info};

#[derive(Args, Debug)]
pub struct StatusesArgs {
    /// Also list the guard conditions
    #[arg(long)]
    pub guards: bool,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRow {
    #[serde(flatten)]
    pub info: StatusInfo,
    pub next_statuses: Vec<NegotiationStatus>,
}

#[derive(Debug, serde::Serialize)]
pub struct GuardRow {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, serde::Serialize)]
pub struct StatusesOutput {
    pub statuses: Vec<StatusRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub guards: Vec<GuardRow>,
}

impl CommandOutput for StatusesOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["status", "label", "priority", "next"]);
        for row in &self.statuses {
            table.add_row(vec![
                colorize_status(row.info.status.as_str()).to_string(),
                row.info.label.to_string(),
                row.info.priority.to_string(),
                row.next_statuses
                    .iter()
                    .map(NegotiationStatus::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            ]);
        }
        let mut out = table.to_string();

        if !self.guards.is_empty() {
            let mut guards = list_table(&["guard", "description"]);
            for guard in &self.guards {
                guards.add_row(vec![guard.name, guard.description]);
            }
            out.push_str(&format!("\n\nGuards:\n{guards}"));
        }
        out
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn build(with_guards: bool) -> StatusesOutput {
    let mut ordered = NegotiationStatus::ALL;
    ordered.sort_by_key(|s| std::cmp::Reverse(s.priority()));

    StatusesOutput {
        statuses: ordered
            .into_iter()
            .map(|status| StatusRow {
                info: status_info(status),
                next_statuses: get_next_statuses(status),
            })
            .collect(),
        guards: if with_guards {
            all_guards()
                .iter()
                .map(|g| GuardRow {
                    name: g.name,
                    description: g.description,
                })
                .collect()
        } else {
            Vec::new()
        },
    }
}

pub fn execute(args: StatusesArgs, json_mode: bool) -> Result<()> {
    output(&build(args.guards), json_mode);
    Ok(())
}
