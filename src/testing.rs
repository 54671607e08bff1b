//! Test doubles for the control plane.
//!
//! Provides [`StubControlPlane`]: a configurable, recording implementation
//! of [`ControlPlane`] for unit and integration tests.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use pitwall::testing::StubControlPlane;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let stub = Arc::new(StubControlPlane::new());
//! stub.fail_register_player(true);
//! // ... drive the component under test with `stub.clone()` ...
//! assert!(stub.calls().is_empty());
//! # }
//! ```

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use crate::orchestration::{ControlPlane, OrchestrationError, Result};

/// One recorded lifecycle call.
///
/// Health reports are counted separately (see
/// [`StubControlPlane::health_reports`]) so ordered assertions over the
/// lifecycle trace are not interleaved with heartbeat noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `mark_ready` was invoked.
    MarkReady,
    /// `request_shutdown` was invoked.
    RequestShutdown,
    /// `set_player_capacity` was invoked with this capacity.
    SetPlayerCapacity(u64),
    /// `register_player` was invoked with this identifier.
    RegisterPlayer(String),
    /// `unregister_player` was invoked with this identifier.
    UnregisterPlayer(String),
}

/// A configurable control-plane stub.
///
/// Supports:
/// - Ordered recording of lifecycle calls via [`calls()`](Self::calls)
/// - Health-report attempt counting via [`health_reports()`](Self::health_reports)
/// - Per-operation failure toggling at runtime
#[derive(Default)]
pub struct StubControlPlane {
    calls: Mutex<Vec<Call>>,
    health_reports: AtomicU32,
    fail_mark_ready: AtomicBool,
    fail_report_health: AtomicBool,
    fail_request_shutdown: AtomicBool,
    fail_set_capacity: AtomicBool,
    fail_register_player: AtomicBool,
    fail_unregister_player: AtomicBool,
}

impl StubControlPlane {
    /// Create a stub where every operation succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded lifecycle calls, in invocation order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of health-report attempts (including failed ones).
    pub fn health_reports(&self) -> u32 {
        self.health_reports.load(Ordering::SeqCst)
    }

    /// Toggle failure of `mark_ready`.
    pub fn fail_mark_ready(&self, fail: bool) {
        self.fail_mark_ready.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of `report_health`.
    pub fn fail_report_health(&self, fail: bool) {
        self.fail_report_health.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of `request_shutdown`.
    pub fn fail_request_shutdown(&self, fail: bool) {
        self.fail_request_shutdown.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of `set_player_capacity`.
    pub fn fail_set_capacity(&self, fail: bool) {
        self.fail_set_capacity.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of `register_player`.
    pub fn fail_register_player(&self, fail: bool) {
        self.fail_register_player.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of `unregister_player`.
    pub fn fail_unregister_player(&self, fail: bool) {
        self.fail_unregister_player.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(operation: &'static str) -> OrchestrationError {
        OrchestrationError::RequestFailed {
            operation,
            reason: "stub failure".to_string(),
        }
    }
}

#[async_trait]
impl ControlPlane for StubControlPlane {
    async fn mark_ready(&self) -> Result<()> {
        if self.fail_mark_ready.load(Ordering::SeqCst) {
            return Err(Self::failure("ready"));
        }
        self.record(Call::MarkReady);
        Ok(())
    }

    async fn report_health(&self) -> Result<()> {
        self.health_reports.fetch_add(1, Ordering::SeqCst);
        if self.fail_report_health.load(Ordering::SeqCst) {
            return Err(Self::failure("health"));
        }
        Ok(())
    }

    async fn request_shutdown(&self) -> Result<()> {
        if self.fail_request_shutdown.load(Ordering::SeqCst) {
            return Err(Self::failure("shutdown"));
        }
        self.record(Call::RequestShutdown);
        Ok(())
    }

    async fn set_player_capacity(&self, capacity: u64) -> Result<()> {
        if self.fail_set_capacity.load(Ordering::SeqCst) {
            return Err(Self::failure("set player capacity"));
        }
        self.record(Call::SetPlayerCapacity(capacity));
        Ok(())
    }

    async fn register_player(&self, id: &str) -> Result<bool> {
        if self.fail_register_player.load(Ordering::SeqCst) {
            return Err(Self::failure("player connect"));
        }
        self.record(Call::RegisterPlayer(id.to_string()));
        Ok(true)
    }

    async fn unregister_player(&self, id: &str) -> Result<bool> {
        if self.fail_unregister_player.load(Ordering::SeqCst) {
            return Err(Self::failure("player disconnect"));
        }
        self.record(Call::UnregisterPlayer(id.to_string()));
        Ok(true)
    }
}
