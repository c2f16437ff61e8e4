//! IPC-backed host calls for the UI process.
//!
//! `IpcHost` implements [`HostCalls`] by sending requests over a framed
//! stream and matching replies by request id. The same connection carries
//! the host's `ParameterChanged` pushes, which the reader task hands to an
//! attached [`PushSink`].

use crate::error::{IpcError, Result};
use crate::protocol::{HostMessage, UiMessage};
use crate::transport::{self, FrameReader, FrameWriter};
use arc_swap::ArcSwapOption;
use paramlink_core::{
    BridgeError, HostCalls, HostFuture, HostOp, ParameterIndex, ParameterValue, PushSink,
    WeakPushSink,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

#[derive(Debug)]
enum HostReply {
    Value(ParameterValue),
    Ack,
    Error(String),
}

struct ClientShared {
    outbound: mpsc::UnboundedSender<UiMessage>,
    pending: Mutex<HashMap<u64, oneshot::Sender<HostReply>>>,
    next_request_id: AtomicU64,
    connected: AtomicBool,
    /// Weak so the session, which owns this host, is not kept alive by it.
    sink: ArcSwapOption<WeakPushSink>,
}

impl ClientShared {
    fn issue(
        &self,
        build: impl FnOnce(u64) -> UiMessage,
    ) -> std::result::Result<oneshot::Receiver<HostReply>, BridgeError> {
        let (tx, rx) = oneshot::channel();
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut pending = self.pending.lock();
            if !self.connected.load(Ordering::Acquire) {
                return Err(BridgeError::Disconnected);
            }
            pending.insert(request_id, tx);
        }

        if self.outbound.send(build(request_id)).is_err() {
            self.pending.lock().remove(&request_id);
            return Err(BridgeError::Disconnected);
        }
        Ok(rx)
    }

    fn dispatch(&self, msg: HostMessage) {
        let (request_id, reply) = match msg {
            HostMessage::ParameterChanged { index, value } => {
                match self.sink.load_full().and_then(|weak| weak.upgrade()) {
                    Some(sink) => {
                        sink.parameter_changed(index, value);
                    }
                    None => tracing::trace!(index, value, "no live push sink, dropping push"),
                }
                return;
            }
            HostMessage::Value { request_id, value } => (request_id, HostReply::Value(value)),
            HostMessage::Ack { request_id } => (request_id, HostReply::Ack),
            HostMessage::Error {
                request_id,
                message,
            } => (request_id, HostReply::Error(message)),
        };

        match self.pending.lock().remove(&request_id) {
            Some(tx) => {
                let _ = tx.send(reply);
            }
            None => tracing::warn!(request_id, "reply for unknown request"),
        }
    }

    /// Mark the connection dead and fail every outstanding call.
    fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
        let dropped = {
            let mut pending = self.pending.lock();
            let count = pending.len();
            pending.clear();
            count
        };
        if dropped > 0 {
            tracing::warn!(dropped, "host connection lost with calls in flight");
        }
    }
}

/// [`HostCalls`] over an IPC connection. Clone is cheap (Arc-based).
#[derive(Clone)]
pub struct IpcHost {
    shared: Arc<ClientShared>,
}

/// Owner of the connection's reader and writer tasks. Aborts them on drop.
pub struct IpcConnection {
    shared: Arc<ClientShared>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl IpcHost {
    /// Start the connection tasks on the current tokio runtime.
    pub fn spawn<S>(stream: S) -> (Self, IpcConnection)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = transport::split(stream);
        let (outbound, outbound_rx) = mpsc::unbounded_channel();

        let shared = Arc::new(ClientShared {
            outbound,
            pending: Mutex::new(HashMap::new()),
            next_request_id: AtomicU64::new(1),
            connected: AtomicBool::new(true),
            sink: ArcSwapOption::empty(),
        });

        let writer = tokio::spawn(Self::writer_loop(
            writer,
            outbound_rx,
            Arc::clone(&shared),
        ));
        let reader = tokio::spawn(Self::reader_loop(reader, Arc::clone(&shared)));

        let connection = IpcConnection {
            shared: Arc::clone(&shared),
            reader: Some(reader),
            writer: Some(writer),
        };
        (Self { shared }, connection)
    }

    /// Connect to a parameter host on a Unix socket.
    #[cfg(unix)]
    pub async fn connect(socket_path: &std::path::Path) -> Result<(Self, IpcConnection)> {
        let stream = transport::connect(socket_path).await?;
        tracing::info!(path = %socket_path.display(), "connected to parameter host");
        Ok(Self::spawn(stream))
    }

    /// Route the host's pushes into a session. Pushes arriving before this are dropped.
    ///
    /// Only a weak reference is kept: once the session is dropped, pushes are
    /// dropped too.
    pub fn attach_sink(&self, sink: &PushSink) {
        self.shared.sink.store(Some(Arc::new(sink.downgrade())));
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    async fn writer_loop<W>(
        mut writer: FrameWriter<W>,
        mut outbound: mpsc::UnboundedReceiver<UiMessage>,
        shared: Arc<ClientShared>,
    ) where
        W: AsyncWrite + Unpin,
    {
        while let Some(msg) = outbound.recv().await {
            let is_shutdown = matches!(msg, UiMessage::Shutdown);
            if let Err(e) = writer.send(&msg).await {
                tracing::warn!(error = %e, "failed to send to host");
                break;
            }
            if is_shutdown {
                break;
            }
        }
        shared.disconnect();
    }

    async fn reader_loop<R>(mut reader: FrameReader<R>, shared: Arc<ClientShared>)
    where
        R: AsyncRead + Unpin,
    {
        loop {
            match reader.recv::<HostMessage>().await {
                Ok(Some(msg)) => shared.dispatch(msg),
                Ok(None) => {
                    tracing::info!("host closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read from host");
                    break;
                }
            }
        }
        shared.disconnect();
    }
}

impl HostCalls for IpcHost {
    fn get_parameter(&self, index: ParameterIndex) -> HostFuture<ParameterValue> {
        let reply = self
            .shared
            .issue(|request_id| UiMessage::get_parameter(request_id, index));
        Box::pin(async move {
            match reply?.await {
                Ok(HostReply::Value(value)) => Ok(value),
                Ok(HostReply::Error(message)) => {
                    Err(BridgeError::host_call(HostOp::GetParameter, index, message))
                }
                Ok(HostReply::Ack) => Err(IpcError::ProtocolError(
                    "acknowledgment in reply to getParameter".to_string(),
                )
                .into()),
                Err(_) => Err(BridgeError::Disconnected),
            }
        })
    }

    fn set_parameter(&self, index: ParameterIndex, value: ParameterValue) -> HostFuture<()> {
        let reply = self
            .shared
            .issue(|request_id| UiMessage::set_parameter(request_id, index, value));
        Box::pin(async move {
            match reply?.await {
                Ok(HostReply::Ack) => Ok(()),
                Ok(HostReply::Error(message)) => {
                    Err(BridgeError::host_call(HostOp::SetParameter, index, message))
                }
                Ok(HostReply::Value(_)) => Err(IpcError::ProtocolError(
                    "value in reply to setParameter".to_string(),
                )
                .into()),
                Err(_) => Err(BridgeError::Disconnected),
            }
        })
    }
}

impl IpcConnection {
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    /// Tell the host we are leaving and stop the connection tasks.
    pub async fn close(mut self) {
        let _ = self.shared.outbound.send(UiMessage::Shutdown);
        if let Some(writer) = self.writer.take() {
            let _ = writer.await;
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.shared.disconnect();
    }
}

impl Drop for IpcConnection {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            writer.abort();
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.shared.disconnect();
    }
}
