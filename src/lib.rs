//! Pitwall: a game-server sidecar for orchestrated fleets.
//!
//! Pitwall supervises a long-running game-server subprocess, tails its
//! unstructured diagnostic output, and translates recognized patterns into
//! lifecycle signals for the orchestration control plane: readiness,
//! liveness heartbeats, player-connect/disconnect accounting, and graceful
//! shutdown once a populated server drains.
//!
//! Module map:
//! - [`classifier`] — pure line → event classification
//! - [`lifecycle`] — event → control-plane-call dispatch and the shutdown
//!   decision
//! - [`supervisor`] — child process ownership and the supervision loop
//! - [`heartbeat`] — fixed-period health reporting
//! - [`orchestration`] — control-plane trait and SDK gateway client
//! - [`config`] / [`cli`] — startup configuration
//! - [`testing`] — recording control-plane stub for tests

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod heartbeat;
pub mod lifecycle;
pub mod orchestration;
pub mod supervisor;
pub mod testing;

pub use classifier::{LifecycleEvent, classify};
pub use config::Config;
pub use lifecycle::{Flow, LifecycleController, LifecycleError, announce_player_capacity};
pub use orchestration::{ControlPlane, HttpSdkClient, OrchestrationError};
pub use supervisor::{ExitOutcome, Supervisor, SupervisorError, SupervisorState};
