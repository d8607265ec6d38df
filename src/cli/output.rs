//! Output formatting utilities for the CLI.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use console::{style, StyledObject};
use serde::Serialize;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Borderless table with upper-cased headers.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Color for a risk level or severity string.
///
/// Respects `NO_COLOR` and non-tty output through `console`.
pub fn colorize_risk(level: &str) -> StyledObject<&str> {
    match level {
        "critical" => style(level).red().bold(),
        "high" => style(level).red(),
        "medium" => style(level).yellow(),
        "low" => style(level).green(),
        _ => style(level),
    }
}

/// Color for a negotiation status string.
pub fn colorize_status(status: &str) -> StyledObject<&str> {
    match status {
        "locked" => style(status).magenta().bold(),
        "agreed" => style(status).green().bold(),
        "pending_approval" => style(status).cyan(),
        "under_discussion" => style(status).yellow(),
        "proposed" => style(status).blue(),
        _ => style(status).dim(),
    }
}

/// Color for a velocity or engagement trend string.
pub fn colorize_trend(trend: &str) -> StyledObject<&str> {
    match trend {
        "accelerating" | "increasing" => style(trend).green(),
        "decelerating" | "decreasing" => style(trend).yellow(),
        "stalled" => style(trend).red().bold(),
        _ => style(trend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer description", 10), "a longe...");
        assert_eq!(truncate("négociation", 6), "nég...");
    }

    #[test]
    fn test_list_table_headers_uppercased() {
        let mut table = list_table(&["factor", "severity"]);
        table.add_row(vec!["inactivity_period", "high"]);
        let rendered = table.to_string();
        assert!(rendered.contains("FACTOR"));
        assert!(rendered.contains("inactivity_period"));
    }
}
