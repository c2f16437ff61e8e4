//! Centralized error type for the paramlink umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Bridge(#[from] paramlink_core::BridgeError),

    #[cfg(feature = "ipc")]
    #[error("IPC: {0}")]
    Ipc(#[from] paramlink_ipc::IpcError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
