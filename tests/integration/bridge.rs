//! Bridge builder and lifecycle.

use crate::helpers::{settle, ScriptedHost};
use paramlink::core::BridgeError;
use paramlink::prelude::*;
use std::time::Duration;

#[tokio::test]
async fn test_builder_applies_options() {
    let host = ScriptedHost::new();
    let bridge = Bridge::builder()
        .placeholder(0.5)
        .call_timeout(Duration::from_millis(250))
        .initial_read_policy(InitialReadPolicy::AlwaysApply)
        .build(host)
        .unwrap();

    let config = bridge.session().config();
    assert_eq!(config.placeholder_value, 0.5);
    assert_eq!(config.call_timeout(), Some(Duration::from_millis(250)));
    assert_eq!(config.initial_read_policy, InitialReadPolicy::AlwaysApply);

    assert_eq!(bridge.bind(0).unwrap().get(), 0.5);
    assert!(bridge.is_connected());
}

#[tokio::test]
async fn test_builder_rejects_invalid_config() {
    let config = BridgeConfig {
        call_timeout_ms: Some(0),
        ..Default::default()
    };
    let result = Bridge::builder().config(config).build(ScriptedHost::new());
    assert!(matches!(
        result,
        Err(paramlink::Error::Bridge(BridgeError::InvalidConfig(_)))
    ));
}

#[test]
fn test_builder_without_runtime_fails() {
    let result = Bridge::builder().build(ScriptedHost::new());
    assert!(matches!(
        result,
        Err(paramlink::Error::Bridge(BridgeError::NoRuntime(_)))
    ));
}

#[test]
fn test_builder_with_explicit_runtime() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let host = ScriptedHost::new();
    let bridge = Bridge::builder()
        .runtime(runtime.handle().clone())
        .build(host.clone())
        .unwrap();

    let binding = bridge.bind(4).unwrap();
    host.answer_get(4, Ok(0.8));
    runtime.block_on(settle());
    assert_eq!(binding.get(), 0.8);
}

#[tokio::test(start_paused = true)]
async fn test_call_timeout_surfaces_as_read_failure() {
    let host = ScriptedHost::new();
    let bridge = Bridge::builder()
        .call_timeout(Duration::from_millis(100))
        .build(host.clone())
        .unwrap();

    let binding = bridge.bind(0).unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    settle().await;

    let failure = binding.last_error().expect("timeout recorded");
    assert!(failure.reason.contains("Timeout"));
    assert_eq!(host.pending_gets(), 1);
}

#[tokio::test]
async fn test_shutdown_closes_session() {
    let host = ScriptedHost::new();
    let bridge = Bridge::builder().build(host).unwrap();
    let session = bridge.session().clone();

    bridge.shutdown().await;
    assert!(!session.is_open());
}
