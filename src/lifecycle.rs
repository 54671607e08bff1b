//! Lifecycle event dispatch.
//!
//! The controller turns classified log events into control-plane calls. It
//! owns the single piece of supervision state: whether any player has ever
//! connected. Events arrive strictly in line order on one sequential path,
//! so no synchronization is needed around that flag.
//!
//! Failure policy is asymmetric on purpose: readiness and shutdown are
//! control-plane-critical transitions and their failures are fatal, while
//! player accounting is best-effort telemetry that is logged and swallowed.

use std::sync::Arc;

use thiserror::Error;

use crate::classifier::LifecycleEvent;
use crate::config::OrchestrationConfig;
use crate::orchestration::{ControlPlane, OrchestrationError};

/// What the supervisor loop should do after an event was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep pumping lines.
    Continue,
    /// Shutdown was requested and acknowledged; exit cleanly.
    Shutdown,
}

/// Fatal lifecycle dispatch errors.
///
/// Player-accounting failures never surface here; they are logged inside
/// the controller and dispatch continues.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The control plane refused the readiness signal. The sidecar cannot
    /// proceed in an unready state.
    #[error("failed to mark server ready: {0}")]
    ReadyFailed(#[source] OrchestrationError),

    /// The control plane refused the shutdown request.
    #[error("failed to request shutdown: {0}")]
    ShutdownFailed(#[source] OrchestrationError),

    /// The control plane refused the startup capacity declaration.
    #[error("failed to set player capacity: {0}")]
    CapacityFailed(#[source] OrchestrationError),
}

/// Declare the server's player capacity at startup.
///
/// Called once before supervision begins. A no-op when player tracking is
/// disabled; with tracking on, a refused declaration is fatal — the control
/// plane would otherwise account against a capacity it never learned.
pub async fn announce_player_capacity(
    control_plane: &dyn ControlPlane,
    config: &OrchestrationConfig,
) -> Result<(), LifecycleError> {
    if !config.player_tracking {
        return Ok(());
    }

    control_plane
        .set_player_capacity(config.player_capacity)
        .await
        .map_err(LifecycleError::CapacityFailed)?;
    tracing::info!(
        capacity = config.player_capacity,
        "Player tracking enabled, capacity declared"
    );
    Ok(())
}

/// Stateful dispatcher from lifecycle events to control-plane calls.
pub struct LifecycleController {
    control_plane: Arc<dyn ControlPlane>,
    player_tracking: bool,
    /// Set on the first player join and never reset. A drained server only
    /// shuts down if it was populated at some point.
    any_player_connected: bool,
}

impl LifecycleController {
    /// Create a controller for the given control plane.
    pub fn new(control_plane: Arc<dyn ControlPlane>, player_tracking: bool) -> Self {
        Self {
            control_plane,
            player_tracking,
            any_player_connected: false,
        }
    }

    /// Whether any player has ever connected.
    pub fn any_player_connected(&self) -> bool {
        self.any_player_connected
    }

    /// Dispatch one classified event.
    ///
    /// Returns [`Flow::Shutdown`] once a shutdown request has been
    /// acknowledged by the control plane; errors are fatal to the sidecar.
    pub async fn handle(&mut self, event: LifecycleEvent) -> Result<Flow, LifecycleError> {
        match event {
            LifecycleEvent::ServerReady => self.on_server_ready().await,
            LifecycleEvent::PlayerJoined { player } => self.on_player_joined(player).await,
            LifecycleEvent::PlayerLeft => self.on_player_left().await,
            LifecycleEvent::NoActivePlayers => self.on_no_active_players().await,
            LifecycleEvent::Unrecognized => Ok(Flow::Continue),
        }
    }

    async fn on_server_ready(&mut self) -> Result<Flow, LifecycleError> {
        tracing::info!("Server reported its startup banner, marking ready");
        self.control_plane
            .mark_ready()
            .await
            .map_err(LifecycleError::ReadyFailed)?;
        Ok(Flow::Continue)
    }

    async fn on_player_joined(&mut self, player: Option<String>) -> Result<Flow, LifecycleError> {
        // The flag is updated even when tracking is off so a later drain
        // still triggers shutdown.
        self.any_player_connected = true;

        if !self.player_tracking {
            tracing::debug!(player = ?player, "Player joined (tracking disabled)");
            return Ok(Flow::Continue);
        }

        let Some(id) = player else {
            tracing::warn!("Player joined but no identifier could be extracted, skipping roster call");
            return Ok(Flow::Continue);
        };

        match self.control_plane.register_player(&id).await {
            Ok(changed) => {
                tracing::info!(player = %id, roster_changed = changed, "Player registered");
            }
            Err(e) => {
                // Best-effort: a mis-registered player must not take down
                // a live match.
                tracing::warn!(player = %id, error = %e, "Failed to register player");
            }
        }
        Ok(Flow::Continue)
    }

    async fn on_player_left(&mut self) -> Result<Flow, LifecycleError> {
        if !self.player_tracking {
            tracing::debug!("Player left (tracking disabled)");
            return Ok(Flow::Continue);
        }

        // Known gap: only the join pattern carries an identifier, so the
        // disconnect cannot name the player and the roster call is skipped.
        // No join-id cache is kept to paper over it.
        tracing::warn!("Player left but the leave pattern carries no identifier, skipping roster call");
        Ok(Flow::Continue)
    }

    async fn on_no_active_players(&mut self) -> Result<Flow, LifecycleError> {
        if !self.any_player_connected {
            // An idle server reporting zero connections at steady state.
            // Shutdown only fires for a server that drained after being
            // populated.
            tracing::debug!("Zero connections reported but no player ever joined, ignoring");
            return Ok(Flow::Continue);
        }

        tracing::info!("Server has no more players, requesting shutdown");
        self.control_plane
            .request_shutdown()
            .await
            .map_err(LifecycleError::ShutdownFailed)?;
        Ok(Flow::Shutdown)
    }
}
