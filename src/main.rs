//! Dealpulse CLI entry point.

use anyhow::Result;
use clap::Parser;

use dealpulse::cli::{commands, Cli, Commands};
use dealpulse::infrastructure::logging::LoggerImpl;
use dealpulse::ConfigLoader;

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&config.logging)?;

    match cli.command {
        Commands::Assess(args) => commands::assess::execute(args, &config, cli.json),
        Commands::Metrics(args) => commands::metrics::execute(args, &config, cli.json),
        Commands::Transition(args) => commands::transition::execute(args, cli.json),
        Commands::Statuses(args) => commands::statuses::execute(args, cli.json),
        Commands::Config(args) => commands::config::execute(args, &config, cli.json),
    }
}

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli) {
        dealpulse::cli::handle_error(err, json);
    }
}
