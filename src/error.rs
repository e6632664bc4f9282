//! Unified error handling for tripquery operations.
//!
//! Every failure is one of four kinds, so a caller can decide whether to
//! retry without inspecting message text:
//! - validation failures, rejected before any store call
//! - not-found, a normal outcome surfaced distinctly from errors
//! - unavailable/timeout, transient store conditions worth retrying
//! - opaque store errors, which never carry query text

use thiserror::Error;

/// Unified error type for tripquery operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripQueryError {
    /// Malformed or out-of-range input, rejected before any store call.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The referenced trip does not exist.
    #[error("trip with ID {trip_id} not found")]
    NotFound { trip_id: i64 },

    /// The store cannot be reached or is refusing work right now.
    #[error("record store unavailable: {message}")]
    Unavailable { message: String },

    /// The store did not answer within its configured window.
    #[error("record store timed out: {message}")]
    Timeout { message: String },

    /// Unexpected query or constraint failure inside the store.
    #[error("record store error: {message}")]
    Store { message: String },
}

impl TripQueryError {
    /// Whether a caller may reasonably retry the same request.
    ///
    /// True only for the transient store conditions; validation and
    /// not-found failures will fail identically on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TripQueryError::Unavailable { .. } | TripQueryError::Timeout { .. }
        )
    }
}

/// Result type alias for tripquery operations.
pub type Result<T> = std::result::Result<T, TripQueryError>;
