//! Control-plane client for lifecycle signaling.
//!
//! The orchestration control plane allocates and monitors game-server
//! instances and expects readiness, health, shutdown, and player-accounting
//! signals from each instance. Its SDK runs as a local gateway next to the
//! sidecar and exposes those operations over HTTP.
//!
//! [`ControlPlane`] is the trait seam the rest of the sidecar depends on;
//! [`HttpSdkClient`] is the production implementation. Tests substitute the
//! recording stub from [`crate::testing`].

pub mod client;
pub mod error;

pub use client::{ControlPlane, HttpSdkClient};
pub use error::{OrchestrationError, Result};
