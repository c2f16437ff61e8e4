//! Builder for Bridge

use crate::core::{BridgeConfig, BridgeSession, HostCalls, InitialReadPolicy, ParameterValue};
use crate::{Bridge, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

#[cfg(feature = "ipc")]
use crate::ipc::IpcHost;
#[cfg(feature = "ipc")]
use tokio::io::{AsyncRead, AsyncWrite};

/// Builder for [`Bridge`].
///
/// ```ignore
/// let bridge = Bridge::builder()
///     .call_timeout(Duration::from_millis(500))
///     .connect("/tmp/param-host.sock")
///     .await?;
/// ```
#[derive(Default)]
pub struct BridgeBuilder {
    config: BridgeConfig,
    runtime: Option<Handle>,
}

impl BridgeBuilder {
    /// Replace the whole config, e.g. one loaded from a file.
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_call_timeout(timeout);
        self
    }

    pub fn initial_read_policy(mut self, policy: InitialReadPolicy) -> Self {
        self.config = self.config.with_initial_read_policy(policy);
        self
    }

    /// Value a binding reports before the host has answered.
    pub fn placeholder(mut self, value: ParameterValue) -> Self {
        self.config = self.config.with_placeholder(value);
        self
    }

    /// Runtime that host calls are spawned on. Defaults to the caller's.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Build on top of an arbitrary host. The caller routes pushes into
    /// [`Bridge::push_sink`].
    pub fn build(self, host: Arc<dyn HostCalls>) -> Result<Bridge> {
        let session = self.session(host)?;
        let sink = session.install_push_sink()?;
        Ok(Bridge::from_parts(
            session,
            sink,
            #[cfg(feature = "ipc")]
            None,
        ))
    }

    /// Build on top of an already-open stream to a parameter host.
    #[cfg(feature = "ipc")]
    pub fn attach<S>(self, stream: S) -> Result<Bridge>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let handle = match &self.runtime {
            Some(handle) => handle.clone(),
            None => Handle::try_current()
                .map_err(|e| crate::core::BridgeError::NoRuntime(e.to_string()))?,
        };
        let (host, connection) = {
            let _guard = handle.enter();
            IpcHost::spawn(stream)
        };
        self.finish_ipc(host, connection)
    }

    /// Connect to a parameter host listening on a Unix socket.
    #[cfg(all(feature = "ipc", unix))]
    pub async fn connect(self, socket_path: impl AsRef<std::path::Path>) -> Result<Bridge> {
        let (host, connection) = IpcHost::connect(socket_path.as_ref()).await?;
        self.finish_ipc(host, connection)
    }

    #[cfg(feature = "ipc")]
    fn finish_ipc(self, host: IpcHost, connection: crate::ipc::IpcConnection) -> Result<Bridge> {
        let session = self.session(Arc::new(host.clone()))?;
        let sink = session.install_push_sink()?;
        // Attached before any bind so no push for a bound index is missed.
        host.attach_sink(&sink);
        Ok(Bridge::from_parts(session, sink, Some(connection)))
    }

    fn session(self, host: Arc<dyn HostCalls>) -> Result<BridgeSession> {
        let session = match self.runtime {
            Some(handle) => BridgeSession::new(host, handle, self.config)?,
            None => BridgeSession::with_current_runtime(host, self.config)?,
        };
        Ok(session)
    }
}
