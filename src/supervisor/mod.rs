//! Game-server process supervision.
//!
//! The supervisor owns the child process for its whole lifetime: it spawns
//! it with the configured listening port, tails its diagnostic stream
//! line-by-line, classifies each line, and hands the resulting events to
//! the lifecycle controller — all while a heartbeat task reports liveness
//! on its own schedule.
//!
//! Exactly two concurrent activities exist (line pump and heartbeat),
//! joined by a single `select!` loop. Events are dispatched one at a time
//! in arrival order. The loop ends when:
//! - the child exits (its status is propagated),
//! - the controller gets a shutdown acknowledged (clean exit),
//! - or any fatal condition fires (readiness/shutdown/heartbeat failure,
//!   spawn failure, or the diagnostic stream closing mid-flight).
//!
//! Fatal paths tear down the child best-effort before returning; the child
//! is never restarted.

pub mod error;
pub mod process;

pub use error::{Result, SupervisorError};
pub use process::{ExitOutcome, Supervisor, SupervisorState};
