//! Subcommand implementations.

pub mod assess;
pub mod config;
pub mod metrics;
pub mod statuses;
pub mod transition;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::domain::models::DealSnapshot;

/// Read a deal snapshot from a JSON file, or from stdin when the path is `-`.
pub fn load_snapshot(path: &Path) -> Result<DealSnapshot> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read deal snapshot from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deal snapshot {}", path.display()))?
    };

    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid deal snapshot JSON in {}", path.display()))
}
