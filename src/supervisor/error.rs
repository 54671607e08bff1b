//! Error types for process supervision.

use thiserror::Error;

use crate::lifecycle::LifecycleError;
use crate::orchestration::OrchestrationError;

/// Result type for supervision operations.
pub type Result<T> = std::result::Result<T, SupervisorError>;

/// Errors that end the supervision loop.
///
/// Every variant is fatal to the sidecar; there is no retry anywhere.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The game-server child process could not be started.
    #[error("failed to start game server '{binary}': {source}")]
    SpawnFailed {
        /// Binary that was invoked.
        binary: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The child's diagnostic stream could not be captured.
    #[error("game server stderr is not available")]
    StderrUnavailable,

    /// Reading the diagnostic stream failed.
    #[error("failed reading game server output: {0}")]
    LineRead(#[source] std::io::Error),

    /// The diagnostic stream closed while the child was still running.
    /// The child stopped talking to us; treated like a crash signal.
    #[error("game server output stream ended while the process is still running")]
    OutputStreamEnded,

    /// Waiting on the child process failed.
    #[error("failed waiting for game server exit: {0}")]
    WaitFailed(#[source] std::io::Error),

    /// A fatal lifecycle dispatch error (readiness or shutdown signaling).
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// A health report failed. The control plane may already consider this
    /// instance dead.
    #[error("heartbeat failed: {0}")]
    HeartbeatFailed(#[source] OrchestrationError),

    /// The heartbeat task stopped without reporting an error.
    #[error("heartbeat task stopped unexpectedly")]
    HeartbeatStopped,
}
