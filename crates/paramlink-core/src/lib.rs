//! Parameter synchronization between an embedded UI and its host
//!
//! The UI (typically a web view inside a plugin editor) cannot touch host
//! state. It reads and writes parameters through two asynchronous host calls
//! and learns about external changes through a push entry point the host
//! calls into. This crate keeps a UI-local value per parameter consistent
//! across both paths.
//!
//! ## Usage
//!
//! ```ignore
//! use paramlink_core::{BridgeConfig, BridgeSession};
//!
//! // `host` implements `HostCalls` (IPC client, direct calls, ...)
//! let session = BridgeSession::with_current_runtime(host, BridgeConfig::default())?;
//!
//! // Give this to the host; it calls `parameter_changed` on automation etc.
//! let sink = session.install_push_sink()?;
//!
//! let gain = session.bind(0)?;
//! gain.set(0.8);              // optimistic, forwarded to the host
//! let shown = gain.get();     // 0.8 right away
//! ```
//!
//! ## Update paths
//!
//! - `set` updates the local value immediately and issues `setParameter`
//! - a push updates the local value only, it never calls back into the host
//! - the first bind of an index issues one `getParameter`; its answer is
//!   dropped if a push or write landed first (configurable, see
//!   [`InitialReadPolicy`])

pub mod error;
pub use error::{BridgeError, HostOp, Result};

mod types;
pub use types::{HostCallFailure, ParameterIndex, ParameterValue, SyncStatus};

mod config;
pub use config::{BridgeConfig, InitialReadPolicy};

mod host;
pub use host::{HostCalls, HostFuture};

mod cell;
pub use cell::{PendingWrite, SyncCell};

mod registry;
pub use registry::CellRegistry;

mod sink;
pub use sink::{PushSink, WeakPushSink};

mod binding;
pub use binding::ParameterBinding;

mod session;
pub use session::BridgeSession;

#[cfg(test)]
mod testing;
