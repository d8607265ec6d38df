//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::assess::AssessArgs;
use super::commands::config::ConfigArgs;
use super::commands::metrics::MetricsArgs;
use super::commands::statuses::StatusesArgs;
use super::commands::transition::TransitionArgs;

#[derive(Parser, Debug)]
#[command(name = "dealpulse")]
#[command(about = "Dealpulse - negotiation workflow and stall-risk analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .dealpulse/
    #[arg(short, long, global = true, env = "DEALPULSE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assess the stall risk of a deal snapshot
    Assess(AssessArgs),

    /// Compute velocity metrics for a deal snapshot
    Metrics(MetricsArgs),

    /// Check whether a term may move between two statuses
    Transition(TransitionArgs),

    /// List negotiation statuses and their allowed transitions
    Statuses(StatusesArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assess_with_global_flags() {
        let cli = Cli::try_parse_from([
            "dealpulse",
            "assess",
            "deal.json",
            "--json",
            "--config",
            "custom.yaml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert!(matches!(cli.command, Commands::Assess(_)));
    }

    #[test]
    fn test_parse_transition() {
        let cli = Cli::try_parse_from([
            "dealpulse",
            "transition",
            "proposed",
            "under_discussion",
            "--deal-lead",
        ])
        .unwrap();
        match cli.command {
            Commands::Transition(args) => {
                assert_eq!(args.from, "proposed");
                assert_eq!(args.to, "under_discussion");
                assert!(args.deal_lead);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
