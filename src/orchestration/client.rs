//! Control-plane trait and HTTP gateway client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::OrchestrationConfig;
use crate::orchestration::error::{OrchestrationError, Result};

/// Lifecycle operations the control plane exposes to a game-server
/// instance.
///
/// Every call is synchronous from the caller's point of view and may fail;
/// the failure policy (fatal vs. best-effort) is decided per call site by
/// the lifecycle controller, not here.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Mark this instance as ready to receive traffic.
    async fn mark_ready(&self) -> Result<()>;

    /// Report liveness. Expected on a fixed period for the whole lifetime
    /// of the instance.
    async fn report_health(&self) -> Result<()>;

    /// Ask the control plane to deallocate this instance.
    async fn request_shutdown(&self) -> Result<()>;

    /// Declare how many players this instance can host.
    async fn set_player_capacity(&self, capacity: u64) -> Result<()>;

    /// Record a player as connected. Returns whether the roster changed.
    async fn register_player(&self, id: &str) -> Result<bool>;

    /// Record a player as disconnected. Returns whether the roster changed.
    async fn unregister_player(&self, id: &str) -> Result<bool>;
}

#[derive(Debug, Serialize)]
struct PlayerId<'a> {
    #[serde(rename = "playerID")]
    player_id: &'a str,
}

#[derive(Debug, Serialize)]
struct Capacity {
    count: u64,
}

/// Player connect/disconnect replies carry a single boolean: whether the
/// roster was actually changed by the call.
#[derive(Debug, Deserialize)]
struct RosterChanged {
    #[serde(rename = "bool", default)]
    changed: bool,
}

/// Control-plane client speaking the SDK's local HTTP gateway.
///
/// The gateway runs next to the sidecar (same pod/host), so no retry or
/// reconnection logic exists here: a failed call is reported to the caller
/// exactly once.
pub struct HttpSdkClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpSdkClient {
    /// Connect to the SDK gateway.
    ///
    /// Builds the HTTP client and probes the gateway once so a missing
    /// gateway is a startup failure rather than a surprise at the first
    /// ready call. Any HTTP answer counts as reachable; only a transport
    /// error is fatal.
    pub async fn connect(config: &OrchestrationConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| OrchestrationError::ConnectFailed {
                url: config.sdk_url.clone(),
                reason: e.to_string(),
            })?;

        let client = Self {
            base_url: config.sdk_url.trim_end_matches('/').to_string(),
            http,
        };

        if let Err(e) = client.http.get(&client.base_url).send().await {
            return Err(OrchestrationError::ConnectFailed {
                url: config.sdk_url.clone(),
                reason: e.to_string(),
            });
        }

        tracing::info!("Connected to SDK gateway at {}", client.base_url);
        Ok(client)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST an empty JSON body to a lifecycle endpoint.
    async fn post_empty(&self, operation: &'static str, path: &str) -> Result<()> {
        let response = self
            .http
            .post(self.url(path))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| OrchestrationError::RequestFailed {
                operation,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(OrchestrationError::Rejected {
                operation,
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    async fn post_player(&self, operation: &'static str, path: &str, id: &str) -> Result<bool> {
        let response = self
            .http
            .post(self.url(path))
            .json(&PlayerId { player_id: id })
            .send()
            .await
            .map_err(|e| OrchestrationError::RequestFailed {
                operation,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(OrchestrationError::Rejected {
                operation,
                status: response.status().as_u16(),
            });
        }

        let reply: RosterChanged =
            response
                .json()
                .await
                .map_err(|e| OrchestrationError::InvalidResponse {
                    operation,
                    reason: e.to_string(),
                })?;
        Ok(reply.changed)
    }
}

#[async_trait]
impl ControlPlane for HttpSdkClient {
    async fn mark_ready(&self) -> Result<()> {
        self.post_empty("ready", "/ready").await
    }

    async fn report_health(&self) -> Result<()> {
        self.post_empty("health", "/health").await
    }

    async fn request_shutdown(&self) -> Result<()> {
        self.post_empty("shutdown", "/shutdown").await
    }

    async fn set_player_capacity(&self, capacity: u64) -> Result<()> {
        let operation = "set player capacity";
        let response = self
            .http
            .put(self.url("/alpha/player/capacity"))
            .json(&Capacity { count: capacity })
            .send()
            .await
            .map_err(|e| OrchestrationError::RequestFailed {
                operation,
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(OrchestrationError::Rejected {
                operation,
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    async fn register_player(&self, id: &str) -> Result<bool> {
        self.post_player("player connect", "/alpha/player/connect", id)
            .await
    }

    async fn unregister_player(&self, id: &str) -> Result<bool> {
        self.post_player("player disconnect", "/alpha/player/disconnect", id)
            .await
    }
}

/// Default request timeout for gateway calls. The gateway is local, so
/// anything slower than this is already a failure.
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
