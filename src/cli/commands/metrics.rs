//! `dealpulse metrics`: velocity metrics and participant engagement.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;

use super::load_snapshot;
use crate::cli::output::{colorize_trend, list_table, output, CommandOutput};
use crate::domain::models::{Config, ParticipantEngagement, VelocityMetrics, NEVER_DAYS};
use crate::domain::ports::{FixedClock, RandomHorizon};
use crate::services::StallRiskAssessor;

#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Deal snapshot JSON file ("-" for stdin)
    pub snapshot: PathBuf,

    /// Evaluate as of this RFC 3339 instant instead of now
    #[arg(long)]
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsOutput {
    pub velocity_metrics: VelocityMetrics,
    pub participants: Vec<ParticipantEngagement>,
}

fn days(value: i64) -> String {
    if value >= NEVER_DAYS {
        "never".to_string()
    } else {
        format!("{value}d ago")
    }
}

impl CommandOutput for MetricsOutput {
    fn to_human(&self) -> String {
        let m = &self.velocity_metrics;
        let mut lines = vec![
            format!("Deal: {}", m.deal_id),
            format!(
                "Velocity trend: {}   Engagement trend: {}",
                colorize_trend(m.velocity_trend.as_str()),
                colorize_trend(m.engagement_trend.as_str())
            ),
            format!(
                "Per day: {:.2} proposals, {:.2} comments, {:.2} agreed terms",
                m.proposals_per_day, m.comments_per_day, m.agreed_terms_per_day
            ),
            format!(
                "Last activity: {}   Last proposal: {}   Last agreement: {}",
                days(m.days_since_last_activity),
                days(m.days_since_last_proposal),
                days(m.days_since_last_agreement)
            ),
            format!(
                "Engagement: {:.0}% active, {:.0}% of proposals answered",
                m.participant_engagement_rate, m.response_rate_to_proposals
            ),
            format!(
                "Progress: {:.1}% per day, {:.0}% of historical pace, {}",
                m.progress_velocity,
                m.compared_to_historical_average * 100.0,
                m.estimated_days_to_completion.map_or_else(
                    || "no completion estimate".to_string(),
                    |d| format!("~{d} days to completion")
                )
            ),
        ];

        if !self.participants.is_empty() {
            let mut table = list_table(&["participant", "party", "role", "score", "last active"]);
            for p in &self.participants {
                table.add_row(vec![
                    p.participant_id.clone(),
                    p.party_name.clone(),
                    p.deal_role.as_str().to_string(),
                    format!("{:.0}", p.engagement_score),
                    days(p.days_since_last_activity),
                ]);
            }
            lines.push(format!("\nParticipants:\n{table}"));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: MetricsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let now = args.as_of.unwrap_or_else(Utc::now);

    let assessor =
        StallRiskAssessor::with_parts(FixedClock::new(now), RandomHorizon, config.patterns.clone());
    let participants = assessor.participants_for(&snapshot);
    let velocity_metrics = assessor.metrics_for(&snapshot, &participants, &config.benchmark);

    output(
        &MetricsOutput {
            velocity_metrics,
            participants,
        },
        json_mode,
    );
    Ok(())
}
