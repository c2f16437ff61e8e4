//! Error types for the parameter bridge

use crate::types::ParameterIndex;
use thiserror::Error;

/// Which host call an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOp {
    GetParameter,
    SetParameter,
}

impl std::fmt::Display for HostOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostOp::GetParameter => write!(f, "getParameter"),
            HostOp::SetParameter => write!(f, "setParameter"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Host call {op}({index}) failed: {reason}")]
    HostCall {
        op: HostOp,
        index: ParameterIndex,
        reason: String,
    },

    #[error("Timeout after {duration_ms}ms: {op}({index})")]
    Timeout {
        op: HostOp,
        index: ParameterIndex,
        duration_ms: u64,
    },

    #[error("Host disconnected")]
    Disconnected,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Push sink already installed for this session")]
    SinkAlreadyInstalled,

    #[error("Bridge session is closed")]
    SessionClosed,

    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Write was dropped before the host answered")]
    WriteDropped,
}

impl BridgeError {
    pub fn host_call(op: HostOp, index: ParameterIndex, reason: impl Into<String>) -> Self {
        BridgeError::HostCall {
            op,
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
