//! Bridge that ties a session to its host connection

use crate::builder::BridgeBuilder;
use crate::core::{BridgeSession, ParameterBinding, ParameterIndex, PushSink};
use crate::Result;

#[cfg(feature = "ipc")]
use crate::ipc::IpcConnection;

/// A bridge session together with its push sink and, when built over IPC,
/// the connection that feeds it.
///
/// Dropping the bridge stops the connection tasks; [`Bridge::shutdown`] also
/// tells the host the UI is leaving.
///
/// # Example
///
/// ```ignore
/// use paramlink::prelude::*;
///
/// let bridge = Bridge::builder().connect("/tmp/param-host.sock").await?;
///
/// let gain = bridge.bind(0)?;
/// gain.set(0.8);
/// assert_eq!(gain.get(), 0.8);
///
/// bridge.shutdown().await;
/// ```
pub struct Bridge {
    session: BridgeSession,
    sink: PushSink,

    #[cfg(feature = "ipc")]
    connection: Option<IpcConnection>,
}

impl Bridge {
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::default()
    }

    pub(crate) fn from_parts(
        session: BridgeSession,
        sink: PushSink,
        #[cfg(feature = "ipc")] connection: Option<IpcConnection>,
    ) -> Self {
        Self {
            session,
            sink,
            #[cfg(feature = "ipc")]
            connection,
        }
    }

    /// Bind a parameter. The first bind of an index reads it from the host.
    pub fn bind(&self, index: ParameterIndex) -> Result<ParameterBinding> {
        Ok(self.session.bind(index)?)
    }

    pub fn session(&self) -> &BridgeSession {
        &self.session
    }

    /// Entry point for host-originated changes. Already wired up when the
    /// bridge was built over IPC.
    pub fn push_sink(&self) -> &PushSink {
        &self.sink
    }

    /// False once the IPC connection has dropped. Always true for a bridge
    /// built on a caller-supplied host.
    pub fn is_connected(&self) -> bool {
        #[cfg(feature = "ipc")]
        if let Some(connection) = &self.connection {
            return connection.is_connected();
        }
        true
    }

    /// Close the session and, for IPC bridges, say goodbye to the host.
    #[allow(unused_mut)]
    pub async fn shutdown(mut self) {
        self.session.shutdown();

        #[cfg(feature = "ipc")]
        if let Some(connection) = self.connection.take() {
            connection.close().await;
        }
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("session", &self.session)
            .field("connected", &self.is_connected())
            .finish()
    }
}
