//! `dealpulse assess`: full stall-risk assessment of a deal snapshot.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;

use super::load_snapshot;
use crate::cli::output::{
    colorize_risk, colorize_trend, list_table, output, truncate, CommandOutput,
};
use crate::domain::models::{Config, DealSnapshot, StallRiskAssessment, VelocityMetrics};
use crate::domain::ports::{FixedClock, FixedHorizon, RandomHorizon, StallHorizon};
use crate::services::StallRiskAssessor;

#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Deal snapshot JSON file ("-" for stdin)
    pub snapshot: PathBuf,

    /// Evaluate as of this RFC 3339 instant instead of now
    #[arg(long)]
    pub as_of: Option<DateTime<Utc>>,

    /// Use a fixed stall horizon (days) instead of a random draw
    #[arg(long)]
    pub horizon_days: Option<u32>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessOutput {
    pub assessment: StallRiskAssessment,
    pub velocity_metrics: VelocityMetrics,
}

impl CommandOutput for AssessOutput {
    fn to_human(&self) -> String {
        let a = &self.assessment;
        let m = &self.velocity_metrics;
        let mut lines = vec![
            format!("Deal: {}", a.deal_id),
            format!(
                "Risk: {} ({:.1}/100)",
                colorize_risk(a.risk_level.as_str()),
                a.overall_risk_score
            ),
            format!("Probability of stall: {:.0}%", a.probability_of_stall * 100.0),
            format!(
                "Estimated days until stall: {}",
                a.estimated_days_until_stall
                    .map_or_else(|| "-".to_string(), |d| d.to_string())
            ),
            format!("Confidence: {:.0}%", a.confidence * 100.0),
            format!(
                "Velocity: {} ({:.2} proposals/day, {:.0}% of historical pace)",
                colorize_trend(m.velocity_trend.as_str()),
                m.proposals_per_day,
                m.compared_to_historical_average * 100.0
            ),
        ];

        if a.risk_factors.is_empty() {
            lines.push("\nNo risk factors detected.".to_string());
        } else {
            let mut table = list_table(&["factor", "severity", "weight", "description"]);
            for factor in &a.risk_factors {
                table.add_row(vec![
                    factor.factor_type.as_str().to_string(),
                    colorize_risk(factor.severity.as_str()).to_string(),
                    format!("{:.2}", factor.weight),
                    truncate(&factor.description, 60),
                ]);
            }
            lines.push(format!("\nRisk factors:\n{table}"));
        }

        if !a.matched_patterns.is_empty() {
            let mut table =
                list_table(&["pattern", "similarity", "outcome", "close rate", "recovery"]);
            for pattern in &a.matched_patterns {
                table.add_row(vec![
                    pattern.pattern_name.clone(),
                    format!("{:.0}%", pattern.similarity * 100.0),
                    pattern.outcome_type.as_str().to_string(),
                    format!("{:.0}%", pattern.historical_close_rate * 100.0),
                    format!("{}d", pattern.average_recovery_days),
                ]);
            }
            lines.push(format!("\nMatched patterns:\n{table}"));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn assess<H: StallHorizon>(
    snapshot: &DealSnapshot,
    config: &Config,
    now: DateTime<Utc>,
    horizon: H,
) -> AssessOutput {
    let assessor =
        StallRiskAssessor::with_parts(FixedClock::new(now), horizon, config.patterns.clone());
    let (velocity_metrics, assessment) = assessor.assess_snapshot(snapshot, &config.benchmark);
    AssessOutput {
        assessment,
        velocity_metrics,
    }
}

pub fn execute(args: AssessArgs, config: &Config, json_mode: bool) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let now = args.as_of.unwrap_or_else(Utc::now);

    let out = match args.horizon_days {
        Some(days) => assess(&snapshot, config, now, FixedHorizon(days)),
        None => assess(&snapshot, config, now, RandomHorizon),
    };

    tracing::info!(
        deal_id = %out.assessment.deal_id,
        level = out.assessment.risk_level.as_str(),
        score = out.assessment.overall_risk_score,
        "Stall risk assessed"
    );

    output(&out, json_mode);
    Ok(())
}
