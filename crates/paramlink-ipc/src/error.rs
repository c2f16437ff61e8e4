//! Error types for the IPC transport

use paramlink_core::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IpcError {
    #[error("Frame of {len} bytes exceeds limit of {max} bytes")]
    FrameTooLarge { len: usize, max: usize },

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown parameter index {0}")]
    UnknownParameter(u32),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, IpcError>;

// Allow IpcError to surface through the HostCalls interface
impl From<IpcError> for BridgeError {
    fn from(e: IpcError) -> Self {
        match e {
            IpcError::ConnectionClosed => BridgeError::Disconnected,
            other => BridgeError::Transport(other.to_string()),
        }
    }
}
