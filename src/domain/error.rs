use thiserror::Error;

use super::models::negotiation::NegotiationStatus;

/// Errors raised by negotiation operations.
///
/// Invalid transitions are input-validation failures: callers recover by
/// refusing the requested change, not by treating it as a system fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("Invalid status transition from {current} to {target}: {reason}")]
    InvalidTransition {
        current: NegotiationStatus,
        target: NegotiationStatus,
        reason: String,
    },
}

pub type NegotiationResult<T> = Result<T, NegotiationError>;
