//! Liveness heartbeat.
//!
//! Reports health to the control plane on a fixed period for the whole
//! lifetime of the sidecar, independent of line processing. The first
//! report is sent immediately on startup. A single failed report ends the
//! loop with an error: a broken heartbeat means the control plane may
//! already consider this instance dead, so continuing is meaningless.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::HeartbeatConfig;
use crate::orchestration::{ControlPlane, OrchestrationError};

/// Periodic health reporter.
pub struct Heartbeat {
    period: Duration,
    control_plane: Arc<dyn ControlPlane>,
}

impl Heartbeat {
    /// Create a heartbeat with the configured period.
    pub fn new(config: &HeartbeatConfig, control_plane: Arc<dyn ControlPlane>) -> Self {
        Self {
            period: config.period,
            control_plane,
        }
    }

    /// Run the heartbeat loop until a report fails.
    ///
    /// There is no retry: the error from the first failed report is
    /// returned and the supervisor treats it as fatal.
    pub async fn run(self) -> Result<(), OrchestrationError> {
        tracing::info!(period = ?self.period, "Starting health reporting");

        let mut interval = tokio::time::interval(self.period);
        loop {
            interval.tick().await;
            self.control_plane.report_health().await?;
            tracing::trace!("Health reported");
        }
    }
}

/// Spawn the heartbeat as a background task.
pub fn spawn_heartbeat(
    config: &HeartbeatConfig,
    control_plane: Arc<dyn ControlPlane>,
) -> JoinHandle<Result<(), OrchestrationError>> {
    let heartbeat = Heartbeat::new(config, control_plane);
    tokio::spawn(heartbeat.run())
}
