//! Reference parameter host.
//!
//! Owns the host-side parameter values, answers the UI's get/set calls and
//! pushes host-originated changes (automation, presets) to every connected UI.

use crate::error::{IpcError, Result};
use crate::protocol::{decode_get_args, decode_set_args, HostMessage, UiMessage};
use crate::transport::{self, FrameReader};
use paramlink_core::{ParameterIndex, ParameterValue};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{broadcast, mpsc};

#[cfg(unix)]
use crate::transport::TransportListener;

/// Configuration for a [`ParameterServer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub parameter_count: usize,
    pub default_value: ParameterValue,
    /// Pushes buffered per connection before a slow UI starts lagging.
    pub push_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            parameter_count: 1,
            default_value: 0.0,
            push_capacity: 64,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.parameter_count == 0 {
            return Err(IpcError::InvalidConfig(
                "parameter_count must be greater than zero".to_string(),
            ));
        }
        if ParameterIndex::try_from(self.parameter_count - 1).is_err() {
            return Err(IpcError::InvalidConfig(format!(
                "parameter_count {} exceeds the index range",
                self.parameter_count
            )));
        }
        if self.push_capacity == 0 {
            return Err(IpcError::InvalidConfig(
                "push_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Host-owned parameter values.
pub struct HostParameters {
    values: RwLock<Vec<ParameterValue>>,
}

impl HostParameters {
    pub fn new(count: usize, default_value: ParameterValue) -> Self {
        Self {
            values: RwLock::new(vec![default_value; count]),
        }
    }

    pub fn get(&self, index: ParameterIndex) -> Option<ParameterValue> {
        self.values.read().get(index as usize).copied()
    }

    pub fn set(&self, index: ParameterIndex, value: ParameterValue) -> Result<()> {
        match self.values.write().get_mut(index as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(IpcError::UnknownParameter(index)),
        }
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<ParameterValue> {
        self.values.read().clone()
    }
}

/// Parameter host serving any number of UI connections. Clone is cheap.
#[derive(Clone)]
pub struct ParameterServer {
    params: Arc<HostParameters>,
    pushes: broadcast::Sender<(ParameterIndex, ParameterValue)>,
}

impl ParameterServer {
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let (pushes, _) = broadcast::channel(config.push_capacity);
        Ok(Self {
            params: Arc::new(HostParameters::new(
                config.parameter_count,
                config.default_value,
            )),
            pushes,
        })
    }

    pub fn parameters(&self) -> &HostParameters {
        &self.params
    }

    /// Change a value on the host side and notify every connected UI.
    pub fn set_from_host(&self, index: ParameterIndex, value: ParameterValue) -> Result<()> {
        self.params.set(index, value)?;
        // No receivers just means no UI is connected.
        let _ = self.pushes.send((index, value));
        Ok(())
    }

    /// Answer one UI call. UI-originated sets are not pushed back out.
    pub fn handle(&self, msg: UiMessage) -> Option<HostMessage> {
        match msg {
            UiMessage::GetParameter { request_id, args } => {
                let reply = decode_get_args(&args).and_then(|index| {
                    self.params
                        .get(index)
                        .ok_or_else(|| IpcError::UnknownParameter(index).to_string())
                });
                Some(match reply {
                    Ok(value) => HostMessage::Value { request_id, value },
                    Err(message) => HostMessage::Error {
                        request_id,
                        message,
                    },
                })
            }
            UiMessage::SetParameter { request_id, args } => {
                let reply = decode_set_args(&args).and_then(|(index, value)| {
                    self.params.set(index, value).map_err(|e| e.to_string())
                });
                Some(match reply {
                    Ok(()) => HostMessage::Ack { request_id },
                    Err(message) => HostMessage::Error {
                        request_id,
                        message,
                    },
                })
            }
            UiMessage::Shutdown => None,
        }
    }

    /// Serve one UI connection until it shuts down or disconnects.
    pub async fn serve<S>(&self, stream: S) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, mut writer) = transport::split(stream);
        let mut pushes = self.pushes.subscribe();

        // Frame reads are not cancel-safe, so they run in their own task.
        let (inbound_tx, mut inbound) = mpsc::unbounded_channel();
        let reader_task = tokio::spawn(Self::read_loop(reader, inbound_tx));

        let result = loop {
            tokio::select! {
                msg = inbound.recv() => match msg {
                    Some(Ok(UiMessage::Shutdown)) | None => break Ok(()),
                    Some(Ok(msg)) => {
                        if let Some(reply) = self.handle(msg) {
                            if let Err(e) = writer.send(&reply).await {
                                break Err(e);
                            }
                        }
                    }
                    Some(Err(e)) => break Err(e),
                },
                push = pushes.recv() => match push {
                    Ok((index, value)) => {
                        if let Err(e) = writer.send(&HostMessage::ParameterChanged { index, value }).await {
                            break Err(e);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "UI lagging behind pushes, resending all values");
                        if let Err(e) = self.resend_all(&mut writer).await {
                            break Err(e);
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break Ok(()),
                },
            }
        };

        reader_task.abort();
        tracing::info!(ok = result.is_ok(), "UI connection finished");
        result
    }

    async fn read_loop<R>(
        mut reader: FrameReader<R>,
        inbound: mpsc::UnboundedSender<Result<UiMessage>>,
    ) where
        R: AsyncRead + Unpin,
    {
        loop {
            match reader.recv::<UiMessage>().await {
                Ok(Some(msg)) => {
                    if inbound.send(Ok(msg)).is_err() {
                        return;
                    }
                }
                Ok(None) => return,
                Err(e) => {
                    let _ = inbound.send(Err(e));
                    return;
                }
            }
        }
    }

    async fn resend_all<W>(&self, writer: &mut transport::FrameWriter<W>) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        for (index, value) in self.params.snapshot().into_iter().enumerate() {
            writer
                .send(&HostMessage::ParameterChanged {
                    index: index as ParameterIndex,
                    value,
                })
                .await?;
        }
        Ok(())
    }

    /// Accept UI connections forever, serving each on its own task.
    #[cfg(unix)]
    pub async fn run(&self, listener: TransportListener) -> Result<()> {
        loop {
            let stream = listener.accept().await?;
            tracing::info!("UI connected");
            let server = self.clone();
            tokio::spawn(async move {
                if let Err(e) = server.serve(stream).await {
                    tracing::warn!(error = %e, "UI connection failed");
                }
            });
        }
    }
}
