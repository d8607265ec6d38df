//! Command-line interface
//!
//! Every command reads its inputs, calls the services layer and renders the
//! result either as a human-readable table or, with `--json`, as JSON.

pub mod commands;
pub mod output;
pub mod types;

use console::style;

pub use types::{Cli, Commands};

/// Report a failed command and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", style("error:").red().bold());
    }
    std::process::exit(1);
}
