//! Supervision loop tests against real child processes.
//!
//! The supervisor appends `-p <port>` to the configured arguments; with
//! `sh -c <script>` those extras land in the script's positional
//! parameters and are ignored.

#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use pitwall::config::{HeartbeatConfig, ServerConfig};
use pitwall::supervisor::{ExitOutcome, Supervisor, SupervisorError};
use pitwall::testing::{Call, StubControlPlane};

fn sh_script(script: &str) -> ServerConfig {
    ServerConfig {
        binary: "/bin/sh".into(),
        args: vec!["-c".to_string(), script.to_string()],
        port: "7654".to_string(),
    }
}

fn supervisor(
    script: &str,
    stub: Arc<StubControlPlane>,
    player_tracking: bool,
) -> Supervisor {
    Supervisor::new(
        sh_script(script),
        HeartbeatConfig::default(),
        stub,
        player_tracking,
    )
}

/// Writes the populated-then-drained lifecycle to stderr, then lingers so
/// only the shutdown decision can end the run.
const DRAIN_SCRIPT: &str = r#"
printf 'Version 1.0\nConnection from 10.0.0.5 on file descriptor 7.\nClosing connection.\nBroker connection count is 0.\n' >&2
sleep 30
"#;

#[tokio::test]
async fn drained_server_requests_shutdown_and_exits_cleanly() {
    let stub = Arc::new(StubControlPlane::new());
    let outcome = supervisor(DRAIN_SCRIPT, stub.clone(), true).run().await;

    assert!(matches!(outcome, Ok(ExitOutcome::ShutdownRequested)));
    assert_eq!(
        stub.calls(),
        vec![
            Call::MarkReady,
            Call::RegisterPlayer("7".to_string()),
            Call::RequestShutdown,
        ]
    );
}

#[tokio::test]
async fn child_exit_status_is_propagated() {
    let stub = Arc::new(StubControlPlane::new());
    let outcome = supervisor("exit 3", stub, false).run().await;

    match outcome {
        Ok(ExitOutcome::ChildExited(status)) => assert_eq!(status.code(), Some(3)),
        other => panic!("expected child exit, got {other:?}"),
    }
}

#[tokio::test]
async fn idle_drain_report_does_not_shut_down() {
    let stub = Arc::new(StubControlPlane::new());
    let outcome = supervisor(
        "printf 'Broker connection count is 0.\\n' >&2; exit 0",
        stub.clone(),
        true,
    )
    .run()
    .await;

    // No player ever joined: the zero-connection report is a no-op and the
    // run ends with the child's own exit.
    match outcome {
        Ok(ExitOutcome::ChildExited(status)) => assert!(status.success()),
        other => panic!("expected child exit, got {other:?}"),
    }
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn closed_diagnostic_stream_is_fatal_while_child_lives() {
    let stub = Arc::new(StubControlPlane::new());
    let outcome = supervisor("exec 2>&-; sleep 30", stub, false).run().await;

    assert!(matches!(outcome, Err(SupervisorError::OutputStreamEnded)));
}

#[tokio::test]
async fn heartbeat_failure_terminates_the_run() {
    let stub = Arc::new(StubControlPlane::new());
    stub.fail_report_health(true);

    let start = std::time::Instant::now();
    let outcome = supervisor("sleep 30", stub, false).run().await;

    assert!(matches!(outcome, Err(SupervisorError::HeartbeatFailed(_))));
    // The first health report fires immediately; the run must not wait out
    // the child.
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn heartbeat_failure_is_detected_under_continuous_output() {
    let stub = Arc::new(StubControlPlane::new());
    stub.fail_report_health(true);

    // The child never stops writing, so the line arm of the supervision
    // select is ready on every iteration. The failed heartbeat must still
    // surface promptly instead of waiting for the pipe to drain.
    let start = std::time::Instant::now();
    let outcome = supervisor("while :; do echo 'chatter' >&2; done", stub, false)
        .run()
        .await;

    assert!(matches!(outcome, Err(SupervisorError::HeartbeatFailed(_))));
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn ready_failure_is_fatal() {
    let stub = Arc::new(StubControlPlane::new());
    stub.fail_mark_ready(true);

    let outcome = supervisor(
        "printf 'Version 1.0\\n' >&2; sleep 30",
        stub,
        false,
    )
    .run()
    .await;

    assert!(matches!(
        outcome,
        Err(SupervisorError::Lifecycle(_))
    ));
}

#[tokio::test]
async fn spawn_failure_is_fatal() {
    let stub = Arc::new(StubControlPlane::new());
    let config = ServerConfig {
        binary: "/nonexistent/game-server".into(),
        args: vec![],
        port: "7654".to_string(),
    };
    let outcome = Supervisor::new(config, HeartbeatConfig::default(), stub, false)
        .run()
        .await;

    assert!(matches!(outcome, Err(SupervisorError::SpawnFailed { .. })));
}
