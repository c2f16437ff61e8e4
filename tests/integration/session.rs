//! Session-level behavior: one cell per index, isolation, teardown.

use crate::helpers::{settle, test_bridge, ScriptedHost};
use paramlink::core::BridgeError;
use paramlink::prelude::*;

#[tokio::test]
async fn test_bindings_share_one_cell() {
    let (bridge, host) = test_bridge();

    let a = bridge.bind(2).unwrap();
    let b = bridge.bind(2).unwrap();
    assert!(a.shares_cell_with(&b));
    assert_eq!(host.get_calls(), vec![2]);

    let _write = a.set(0.75);
    assert_eq!(b.get(), 0.75);

    bridge.push_sink().parameter_changed(2, 0.25);
    assert_eq!(a.get(), 0.25);
    assert_eq!(b.get(), 0.25);
}

#[tokio::test]
async fn test_push_for_unbound_index_is_dropped() {
    let (bridge, host) = test_bridge();

    assert!(!bridge.push_sink().parameter_changed(8, 1.0));
    assert!(bridge.session().registered_indices().is_empty());

    // Binding afterwards still starts from the host's value.
    let binding = bridge.bind(8).unwrap();
    host.answer_get(8, Ok(0.4));
    settle().await;
    assert_eq!(binding.get(), 0.4);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let (first, first_host) = test_bridge();
    let (second, second_host) = test_bridge();

    let a = first.bind(0).unwrap();
    let b = second.bind(0).unwrap();

    first.push_sink().parameter_changed(0, 0.9);
    assert_eq!(a.get(), 0.9);
    assert_eq!(b.get(), 0.0);

    let _write = b.set(0.1);
    assert_eq!(a.get(), 0.9);
    assert!(first_host.set_calls().is_empty());
    assert_eq!(second_host.set_calls(), vec![(0, 0.1)]);
}

#[tokio::test]
async fn test_push_sink_installed_once() {
    let host = ScriptedHost::new();
    let session =
        BridgeSession::with_current_runtime(host, BridgeConfig::default()).unwrap();

    let _sink = session.install_push_sink().unwrap();
    assert!(matches!(
        session.install_push_sink(),
        Err(BridgeError::SinkAlreadyInstalled)
    ));
}

#[tokio::test]
async fn test_shutdown_discards_late_completions() {
    let (bridge, host) = test_bridge();

    let binding = bridge.bind(0).unwrap();
    let session = bridge.session().clone();
    session.shutdown();

    host.answer_get(0, Ok(5.0));
    settle().await;
    assert_eq!(binding.get(), 0.0);

    assert!(!bridge.push_sink().parameter_changed(0, 1.0));
    let err = binding.set(2.0).acknowledged().await.unwrap_err();
    assert!(matches!(err, BridgeError::SessionClosed));
    assert!(host.set_calls().is_empty());

    assert!(matches!(bridge.bind(1), Err(paramlink::Error::Bridge(BridgeError::SessionClosed))));
}
