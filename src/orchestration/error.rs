//! Error types for control-plane operations.

use thiserror::Error;

/// Result type for control-plane operations.
pub type Result<T> = std::result::Result<T, OrchestrationError>;

/// Errors that can occur talking to the orchestration control plane.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// The SDK gateway could not be reached at startup.
    #[error("could not connect to SDK gateway at '{url}': {reason}")]
    ConnectFailed {
        /// Gateway base URL.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// A lifecycle call failed in transport.
    #[error("{operation} request failed: {reason}")]
    RequestFailed {
        /// Operation name, e.g. "ready" or "health".
        operation: &'static str,
        /// Reason for failure.
        reason: String,
    },

    /// The gateway answered with a non-success status.
    #[error("{operation} rejected by gateway with status {status}")]
    Rejected {
        /// Operation name.
        operation: &'static str,
        /// HTTP status code returned.
        status: u16,
    },

    /// The gateway reply could not be decoded.
    #[error("invalid {operation} response: {reason}")]
    InvalidResponse {
        /// Operation name.
        operation: &'static str,
        /// Reason for failure.
        reason: String,
    },
}
