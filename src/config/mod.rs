//! Startup configuration.
//!
//! Configuration is read once at startup and immutable thereafter.
//! Precedence: CLI flags over `PITWALL_*` environment variables over
//! built-in defaults (`dotenvy` loads a `.env` file before resolution in
//! `main`).

mod heartbeat;
pub(crate) mod helpers;
mod orchestration;
mod server;

pub use heartbeat::HeartbeatConfig;
pub use orchestration::OrchestrationConfig;
pub use server::ServerConfig;

use crate::cli::Cli;
use crate::error::ConfigError;

/// Complete sidecar configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Child-process settings.
    pub server: ServerConfig,
    /// Control-plane settings.
    pub orchestration: OrchestrationConfig,
    /// Heartbeat settings.
    pub heartbeat: HeartbeatConfig,
}

impl Config {
    /// Resolve the full configuration from CLI flags and environment.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::resolve(cli)?,
            orchestration: OrchestrationConfig::resolve(cli)?,
            heartbeat: HeartbeatConfig::resolve(cli)?,
        })
    }
}
