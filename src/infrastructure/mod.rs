//! Infrastructure layer module
//!
//! Adapters around the process environment:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)

pub mod config;
pub mod logging;
