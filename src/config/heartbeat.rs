//! Configuration for the liveness heartbeat.

use std::time::Duration;

use crate::cli::Cli;
use crate::config::helpers::env_or;
use crate::error::ConfigError;

/// Default period between health reports, in seconds.
const DEFAULT_PERIOD_SECS: u64 = 2;

/// Heartbeat configuration.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Period between health reports.
    pub period: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(DEFAULT_PERIOD_SECS),
        }
    }
}

impl HeartbeatConfig {
    pub(crate) fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let secs = match cli.heartbeat_secs {
            Some(s) => s,
            None => env_or("PITWALL_HEARTBEAT_SECS", DEFAULT_PERIOD_SECS)?,
        };
        if secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "PITWALL_HEARTBEAT_SECS".to_string(),
                message: "period must be at least 1 second".to_string(),
            });
        }
        Ok(Self {
            period: Duration::from_secs(secs),
        })
    }
}
