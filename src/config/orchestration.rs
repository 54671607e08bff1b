//! Configuration for the control-plane SDK gateway.

use std::time::Duration;

use crate::cli::Cli;
use crate::config::helpers::{env_or, optional_env};
use crate::error::ConfigError;
use crate::orchestration::client::DEFAULT_REQUEST_TIMEOUT;

/// Default SDK gateway address (local HTTP gateway next to the sidecar).
const DEFAULT_SDK_URL: &str = "http://localhost:9358";

/// Default player capacity declared at startup when tracking is enabled.
const DEFAULT_PLAYER_CAPACITY: u64 = 8;

/// Control-plane configuration.
#[derive(Debug, Clone)]
pub struct OrchestrationConfig {
    /// Base URL of the SDK's local HTTP gateway.
    pub sdk_url: String,
    /// Whether individual player connects/disconnects are reported.
    ///
    /// Off by default. Player events still update the sidecar's own
    /// shutdown bookkeeping when disabled; only the roster calls are
    /// skipped.
    pub player_tracking: bool,
    /// Player capacity declared once at startup (tracking only).
    pub player_capacity: u64,
    /// Per-request timeout for gateway calls.
    pub request_timeout: Duration,
}

impl OrchestrationConfig {
    pub(crate) fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let sdk_url = cli
            .sdk_url
            .clone()
            .or(optional_env("PITWALL_SDK_URL")?)
            .unwrap_or_else(|| DEFAULT_SDK_URL.to_string());

        let player_tracking =
            cli.player_tracking || env_or("PITWALL_PLAYER_TRACKING", false)?;

        let player_capacity = match cli.player_capacity {
            Some(n) => n,
            None => env_or("PITWALL_PLAYER_CAPACITY", DEFAULT_PLAYER_CAPACITY)?,
        };

        let timeout_secs = env_or(
            "PITWALL_SDK_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT.as_secs(),
        )?;

        Ok(Self {
            sdk_url,
            player_tracking,
            player_capacity,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
