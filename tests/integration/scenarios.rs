//! End-to-end update paths on a single parameter.

use crate::helpers::{settle, test_bridge, test_bridge_with};
use paramlink::core::{BridgeError, HostOp};
use paramlink::prelude::*;

#[tokio::test]
async fn test_initial_read_populates_value() {
    let (bridge, host) = test_bridge();

    let binding = bridge.bind(0).unwrap();
    assert_eq!(binding.get(), 0.0);
    assert_eq!(binding.status(), SyncStatus::Initializing);
    assert_eq!(host.get_calls(), vec![0]);

    host.answer_get(0, Ok(5.0));
    settle().await;

    assert_eq!(binding.get(), 5.0);
    assert!(binding.status().is_synced());
    assert!(host.set_calls().is_empty());
}

#[tokio::test]
async fn test_write_before_initial_read_keeps_write() {
    let (bridge, host) = test_bridge();

    let binding = bridge.bind(0).unwrap();
    let _write = binding.set(7.0);
    assert_eq!(binding.get(), 7.0);

    // The read was issued before the write and answers with the stale value.
    host.answer_get(0, Ok(1.0));
    settle().await;

    assert_eq!(binding.get(), 7.0);
    assert_eq!(host.set_calls(), vec![(0, 7.0)]);
}

#[tokio::test]
async fn test_write_before_initial_read_always_apply() {
    let config = BridgeConfig::default().with_initial_read_policy(InitialReadPolicy::AlwaysApply);
    let (bridge, host) = test_bridge_with(config);

    let binding = bridge.bind(0).unwrap();
    let _write = binding.set(7.0);
    assert_eq!(binding.get(), 7.0);

    host.answer_get(0, Ok(1.0));
    settle().await;

    assert_eq!(binding.get(), 1.0);
}

#[tokio::test]
async fn test_push_while_idle_does_not_call_host() {
    let (bridge, host) = test_bridge();

    let binding = bridge.bind(0).unwrap();
    host.answer_get(0, Ok(0.5));
    settle().await;

    assert!(bridge.push_sink().parameter_changed(0, 3.0));
    assert_eq!(binding.get(), 3.0);
    settle().await;

    assert!(host.set_calls().is_empty());
    assert_eq!(host.get_calls(), vec![0]);
}

#[tokio::test]
async fn test_push_before_ack_wins() {
    let (bridge, host) = test_bridge();

    let binding = bridge.bind(0).unwrap();
    host.answer_get(0, Ok(0.0));
    settle().await;

    let write = binding.set(2.0);
    settle().await;
    bridge.push_sink().parameter_changed(0, 9.0);
    assert_eq!(binding.get(), 9.0);

    host.answer_set(Ok(()));
    write.acknowledged().await.unwrap();

    assert_eq!(binding.get(), 9.0);
    assert_eq!(host.set_calls(), vec![(0, 2.0)]);
    assert!(binding.status().is_synced());
}

#[tokio::test]
async fn test_push_before_initial_read_keeps_push() {
    let (bridge, host) = test_bridge();

    let binding = bridge.bind(0).unwrap();
    bridge.push_sink().parameter_changed(0, 4.0);

    host.answer_get(0, Ok(1.0));
    settle().await;

    assert_eq!(binding.get(), 4.0);
    assert!(binding.status().is_synced());
}

#[tokio::test]
async fn test_failed_write_is_observable() {
    let (bridge, host) = test_bridge();

    let binding = bridge.bind(1).unwrap();
    host.answer_get(1, Ok(0.2));
    settle().await;

    let write = binding.set(0.9);
    host.answer_set(Err(BridgeError::host_call(
        HostOp::SetParameter,
        1,
        "read-only parameter",
    )));

    let err = write.acknowledged().await.unwrap_err();
    assert!(matches!(err, BridgeError::HostCall { index: 1, .. }));

    // The optimistic value stays; the failure is reported next to it.
    assert_eq!(binding.get(), 0.9);
    let failure = binding.last_error().expect("write failure recorded");
    assert_eq!(failure.op, HostOp::SetParameter);
    assert!(failure.reason.contains("read-only parameter"));
}

#[tokio::test]
async fn test_failed_initial_read_keeps_placeholder() {
    let config = BridgeConfig::default().with_placeholder(-1.0);
    let (bridge, host) = test_bridge_with(config);

    let binding = bridge.bind(3).unwrap();
    host.answer_get(3, Err(BridgeError::Disconnected));
    settle().await;

    assert_eq!(binding.get(), -1.0);
    assert!(matches!(binding.status(), SyncStatus::ReadFailed(_)));

    // A later push still brings the cell in sync.
    bridge.push_sink().parameter_changed(3, 0.6);
    assert_eq!(binding.get(), 0.6);
    assert!(binding.status().is_synced());
}

#[tokio::test]
async fn test_failed_read_after_write_keeps_write_status() {
    let (bridge, host) = test_bridge();

    let binding = bridge.bind(0).unwrap();
    let write = binding.set(7.0);
    host.answer_get(0, Err(BridgeError::Disconnected));
    settle().await;

    assert_eq!(binding.get(), 7.0);
    assert_eq!(binding.status(), SyncStatus::Initializing);
    assert!(binding.last_error().is_none());

    // The write's own outcome decides the status.
    host.answer_set(Ok(()));
    write.acknowledged().await.unwrap();
    assert!(binding.status().is_synced());
}

#[tokio::test]
async fn test_subscribers_see_every_path() {
    let (bridge, host) = test_bridge();

    let binding = bridge.bind(0).unwrap();
    let mut changes = binding.subscribe();

    host.answer_get(0, Ok(0.1));
    changes.changed().await.unwrap();
    assert_eq!(*changes.borrow_and_update(), 0.1);

    let _write = binding.set(0.2);
    changes.changed().await.unwrap();
    assert_eq!(*changes.borrow_and_update(), 0.2);

    bridge.push_sink().parameter_changed(0, 0.3);
    changes.changed().await.unwrap();
    assert_eq!(*changes.borrow_and_update(), 0.3);
}
