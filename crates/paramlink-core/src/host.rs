//! Host call interface: the two asynchronous operations the bridge consumes.

use crate::error::{BridgeError, HostOp, Result};
use crate::types::{ParameterIndex, ParameterValue};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future returned by host calls. `Send + 'static` so it can be spawned.
pub type HostFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

/// Asynchronous calls into the application that owns the parameters.
///
/// Implementations decide how the call travels (direct call, IPC, script
/// evaluation in a web view). The bridge only relies on the signatures and on
/// each future eventually completing, failing, or being dropped.
pub trait HostCalls: Send + Sync + 'static {
    /// Read the host's current value for `index`.
    fn get_parameter(&self, index: ParameterIndex) -> HostFuture<ParameterValue>;

    /// Ask the host to change `index` to `value`. The acknowledgment carries no data.
    fn set_parameter(&self, index: ParameterIndex, value: ParameterValue) -> HostFuture<()>;
}

/// Await a host call, failing with [`BridgeError::Timeout`] if `timeout` elapses first.
pub(crate) async fn with_timeout<T>(
    call: HostFuture<T>,
    timeout: Option<Duration>,
    op: HostOp,
    index: ParameterIndex,
) -> Result<T> {
    match timeout {
        None => call.await,
        Some(duration) => match tokio::time::timeout(duration, call).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Timeout {
                op,
                index,
                duration_ms: duration.as_millis() as u64,
            }),
        },
    }
}
