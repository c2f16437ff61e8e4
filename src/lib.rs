//! # paramlink - UI/host parameter bridge
//!
//! Keeps the parameter values an embedded plugin UI shows in step with the
//! host that owns them.
//!
//! ## Architecture
//!
//! paramlink is an umbrella crate over:
//! - **paramlink-core** - Sync cells, the per-index registry, push sink and bindings
//! - **paramlink-ipc** - Socket transport, IPC host client and reference parameter server
//!
//! ## Quick Start
//!
//! ```ignore
//! use paramlink::prelude::*;
//!
//! // UI side, talking to a `param-host` process
//! let bridge = Bridge::builder()
//!     .call_timeout(std::time::Duration::from_secs(1))
//!     .connect("/tmp/param-host.sock")
//!     .await?;
//!
//! let cutoff = bridge.bind(0)?;
//! cutoff.set(0.3);                  // shown immediately, forwarded to the host
//! let mut changes = cutoff.subscribe();
//! changes.changed().await?;         // host automation arrives here
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Core bridge plus IPC
//! - `ipc` - Socket transport, `IpcHost` and `ParameterServer`

/// Re-export of paramlink-core for direct access
pub use paramlink_core as core;

pub use paramlink_core::{
    BridgeConfig, BridgeError, BridgeSession, HostCallFailure, HostCalls, HostFuture, HostOp,
    InitialReadPolicy, ParameterBinding, ParameterIndex, ParameterValue, PendingWrite, PushSink,
    SyncStatus,
};

// IPC
#[cfg(feature = "ipc")]
pub use paramlink_ipc as ipc;

#[cfg(feature = "ipc")]
pub use paramlink_ipc::{IpcConnection, IpcError, IpcHost, ParameterServer, ServerConfig};

mod error;
pub use error::{Error, Result};

mod bridge;
mod builder;

pub use bridge::Bridge;
pub use builder::BridgeBuilder;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Bridge, BridgeBuilder};

    pub use crate::core::{
        BridgeConfig, BridgeSession, HostCalls, InitialReadPolicy, ParameterBinding, PushSink,
        SyncStatus,
    };

    #[cfg(feature = "ipc")]
    pub use crate::ipc::{ParameterServer, ServerConfig};
}
