//! Socket transport for paramlink
//!
//! Carries the two host calls and the host's change notifications between a
//! UI process and the process that owns the parameters.
//!
//! ## Usage
//!
//! ```ignore
//! use paramlink_core::{BridgeConfig, BridgeSession};
//! use paramlink_ipc::IpcHost;
//! use std::sync::Arc;
//!
//! // UI side: connect, build a session on top, route pushes into it
//! let (host, connection) = IpcHost::connect("/tmp/param-host.sock".as_ref()).await?;
//! let session = BridgeSession::with_current_runtime(Arc::new(host.clone()), BridgeConfig::default())?;
//! host.attach_sink(&session.install_push_sink()?);
//!
//! let cutoff = session.bind(0)?;
//! cutoff.set(0.3);
//! ```
//!
//! The host side is [`ParameterServer`], also runnable standalone as the
//! `param-host` binary.

pub mod error;
pub use error::{IpcError, Result};

#[doc(hidden)]
pub mod protocol;
pub use protocol::{HostMessage, UiMessage, WireValue, MAX_FRAME_LEN};

pub mod transport;

mod client;
pub use client::{IpcConnection, IpcHost};

mod server;
pub use server::{HostParameters, ParameterServer, ServerConfig};
