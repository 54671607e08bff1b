//! End-to-end lifecycle traces: scripted server output driven through the
//! classifier and controller, asserting on the ordered control-plane calls.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use pitwall::classifier::classify;
use pitwall::lifecycle::{Flow, LifecycleController};
use pitwall::testing::{Call, StubControlPlane};

/// A populated server starting up, hosting one player, and draining.
const DRAIN_SEQUENCE: &[&str] = &[
    "Version 1.2.3",
    "Connection from 10.0.0.5 on file descriptor 7.",
    "Closing connection",
    "Broker connection count is 0",
];

/// Feed lines through classify + dispatch, returning the stub and the flow
/// after the last line.
async fn drive(lines: &[&str], player_tracking: bool) -> (Arc<StubControlPlane>, Flow) {
    let stub = Arc::new(StubControlPlane::new());
    let mut controller = LifecycleController::new(stub.clone(), player_tracking);

    let mut flow = Flow::Continue;
    for line in lines {
        flow = controller.handle(classify(line)).await.expect("dispatch failed");
    }
    (stub, flow)
}

#[tokio::test]
async fn drain_sequence_with_tracking() {
    let (stub, flow) = drive(DRAIN_SEQUENCE, true).await;

    // The disconnect carries no identifier, so no unregister call appears.
    assert_eq!(
        stub.calls(),
        vec![
            Call::MarkReady,
            Call::RegisterPlayer("7".to_string()),
            Call::RequestShutdown,
        ]
    );
    assert_eq!(flow, Flow::Shutdown);
}

#[tokio::test]
async fn drain_sequence_without_tracking() {
    let (stub, flow) = drive(DRAIN_SEQUENCE, false).await;

    assert_eq!(stub.calls(), vec![Call::MarkReady, Call::RequestShutdown]);
    assert_eq!(flow, Flow::Shutdown);
}

#[tokio::test]
async fn drain_without_prior_join_keeps_running() {
    let (stub, flow) = drive(&["Broker connection count is 0"], true).await;

    assert!(stub.calls().is_empty());
    assert_eq!(flow, Flow::Continue);
}

#[tokio::test]
async fn register_failure_does_not_stop_the_pipeline() {
    let stub = Arc::new(StubControlPlane::new());
    stub.fail_register_player(true);
    let mut controller = LifecycleController::new(stub.clone(), true);

    let mut flow = Flow::Continue;
    for line in DRAIN_SEQUENCE {
        flow = controller.handle(classify(line)).await.expect("dispatch failed");
    }

    // The failed roster call is swallowed; ready and shutdown still land.
    assert_eq!(stub.calls(), vec![Call::MarkReady, Call::RequestShutdown]);
    assert_eq!(flow, Flow::Shutdown);
}

#[tokio::test]
async fn unmatched_chatter_produces_no_calls() {
    let (stub, flow) = drive(
        &[
            "Listening on 0.0.0.0:7654",
            "hello from a player",
            "... some stack trace ...",
        ],
        true,
    )
    .await;

    assert!(stub.calls().is_empty());
    assert_eq!(flow, Flow::Continue);
}
