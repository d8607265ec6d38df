//! Domain layer for the Dealpulse negotiation engine
//!
//! This module contains the negotiation vocabulary, analytics value types,
//! and the ports through which the engine reads time and randomness.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{NegotiationError, NegotiationResult};
