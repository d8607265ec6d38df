use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::collections::HashSet;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error(
        "Invalid inactivity thresholds: warning days ({0}) must be less than critical days ({1})"
    )]
    InvalidInactivityThresholds(i64, i64),

    #[error("Invalid velocity range: min proposals/day ({0}) exceeds max ({1})")]
    InvalidVelocityRange(f64, f64),

    #[error("Invalid average days to close: {0}. Must be positive")]
    InvalidAverageDaysToClose(f64),

    #[error("Invalid close rate for pattern '{0}': {1}. Must be between 0 and 1")]
    InvalidCloseRate(String, f64),

    #[error("Pattern id cannot be empty")]
    EmptyPatternId,

    #[error("Duplicate pattern id: {0}")]
    DuplicatePatternId(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .dealpulse/config.yaml (project config)
    /// 3. .dealpulse/local.yaml (project local overrides, optional)
    /// 4. Environment variables (DEALPULSE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".dealpulse/config.yaml"))
            .merge(Yaml::file(".dealpulse/local.yaml"))
            .merge(Env::prefixed("DEALPULSE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let benchmark = &config.benchmark;
        if benchmark.inactivity_warning_days >= benchmark.inactivity_critical_days {
            return Err(ConfigError::InvalidInactivityThresholds(
                benchmark.inactivity_warning_days,
                benchmark.inactivity_critical_days,
            ));
        }

        let range = &benchmark.healthy_velocity_range;
        if range.min_proposals_per_day > range.max_proposals_per_day {
            return Err(ConfigError::InvalidVelocityRange(
                range.min_proposals_per_day,
                range.max_proposals_per_day,
            ));
        }

        if benchmark.average_days_to_close <= 0.0 {
            return Err(ConfigError::InvalidAverageDaysToClose(
                benchmark.average_days_to_close,
            ));
        }

        let mut seen = HashSet::new();
        for pattern in &config.patterns.patterns {
            if pattern.id.trim().is_empty() {
                return Err(ConfigError::EmptyPatternId);
            }
            if !seen.insert(pattern.id.as_str()) {
                return Err(ConfigError::DuplicatePatternId(pattern.id.clone()));
            }
            if !(0.0..=1.0).contains(&pattern.historical_close_rate) {
                return Err(ConfigError::InvalidCloseRate(
                    pattern.id.clone(),
                    pattern.historical_close_rate,
                ));
            }
        }

        Ok(())
    }
}
