//! Crate-level error types shared across modules.
//!
//! Domain-specific errors live next to their modules
//! ([`crate::orchestration::OrchestrationError`],
//! [`crate::supervisor::SupervisorError`]); this module holds the errors
//! produced before any component is running.

use thiserror::Error;

/// Errors raised while resolving configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was present but not valid UTF-8.
    #[error("environment variable '{key}' is not valid UTF-8")]
    NotUnicode {
        /// Variable name.
        key: String,
    },

    /// A configuration value could not be parsed.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue {
        /// Variable or flag name.
        key: String,
        /// What went wrong.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration '{key}'")]
    Missing {
        /// Variable or flag name.
        key: String,
    },
}
