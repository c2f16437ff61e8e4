//! Parameter sync cell: one UI-side copy of a host-owned value.
//!
//! A cell has two writers that never coordinate with each other:
//!
//! - **writes** from the UI, applied optimistically and forwarded to the host
//!   with `setParameter`
//! - **pushes** from the host, applied locally and never forwarded back
//!
//! plus the one-off initial `getParameter` read. Every mutation bumps a
//! version counter; the initial read uses it to detect that it went stale
//! while in flight (see [`InitialReadPolicy`]).

use crate::config::{BridgeConfig, InitialReadPolicy};
use crate::error::{BridgeError, HostOp, Result};
use crate::host::{with_timeout, HostCalls};
use crate::types::{HostCallFailure, ParameterIndex, ParameterValue, SyncStatus};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};

/// Everything a cell borrows from its session.
#[derive(Clone)]
pub(crate) struct CellContext {
    pub host: Arc<dyn HostCalls>,
    pub runtime: Handle,
    pub config: BridgeConfig,
    /// Cleared on session shutdown; completions arriving afterwards are discarded.
    pub open: Arc<AtomicBool>,
}

#[derive(Debug)]
struct CellState {
    current: ParameterValue,
    version: u64,
    status: SyncStatus,
}

/// Reconciliation unit for one parameter index.
///
/// Obtained through [`BridgeSession::bind`](crate::BridgeSession::bind), which
/// guarantees a single cell per index and session.
pub struct SyncCell {
    index: ParameterIndex,
    host: Arc<dyn HostCalls>,
    runtime: Handle,
    timeout: Option<Duration>,
    policy: InitialReadPolicy,
    open: Arc<AtomicBool>,
    initialized: AtomicBool,
    state: RwLock<CellState>,
    changes: watch::Sender<ParameterValue>,
}

/// Completion handle for a fire-and-forget write.
///
/// Dropping it does not cancel the host call.
#[derive(Debug)]
pub struct PendingWrite {
    rx: oneshot::Receiver<Result<()>>,
}

impl PendingWrite {
    fn resolved(result: Result<()>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    /// Wait for the host's acknowledgment of this write.
    pub async fn acknowledged(self) -> Result<()> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::WriteDropped),
        }
    }
}

impl SyncCell {
    pub(crate) fn new(index: ParameterIndex, ctx: &CellContext) -> Self {
        let placeholder = ctx.config.placeholder_value;
        let (changes, _) = watch::channel(placeholder);
        Self {
            index,
            host: Arc::clone(&ctx.host),
            runtime: ctx.runtime.clone(),
            timeout: ctx.config.call_timeout(),
            policy: ctx.config.initial_read_policy,
            open: Arc::clone(&ctx.open),
            initialized: AtomicBool::new(false),
            state: RwLock::new(CellState {
                current: placeholder,
                version: 0,
                status: SyncStatus::Initializing,
            }),
            changes,
        }
    }

    pub fn index(&self) -> ParameterIndex {
        self.index
    }

    /// Current value. Never blocks on the host.
    pub fn read(&self) -> ParameterValue {
        self.state.read().current
    }

    pub fn status(&self) -> SyncStatus {
        self.state.read().status.clone()
    }

    /// Number of mutations applied so far (initial read, pushes and writes).
    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    /// Receiver notified on every applied mutation.
    pub fn subscribe(&self) -> watch::Receiver<ParameterValue> {
        self.changes.subscribe()
    }

    fn is_live(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Issue the cell's single `getParameter` call.
    ///
    /// Returns `false` without calling the host if the cell was already initialized.
    pub fn initialize(self: &Arc<Self>) -> bool {
        if self.initialized.swap(true, Ordering::AcqRel) {
            tracing::debug!(index = self.index, "cell already initialized");
            return false;
        }

        let issued_at = self.state.read().version;
        let call = self.host.get_parameter(self.index);
        tracing::debug!(index = self.index, "getParameter issued");

        let cell = Arc::clone(self);
        self.runtime.spawn(async move {
            let result = with_timeout(call, cell.timeout, HostOp::GetParameter, cell.index).await;
            cell.complete_initial_read(issued_at, result);
        });
        true
    }

    fn complete_initial_read(&self, issued_at: u64, result: Result<ParameterValue>) {
        if !self.is_live() {
            tracing::debug!(index = self.index, "session closed, discarding initial read");
            return;
        }

        let mut state = self.state.write();
        match result {
            Ok(value) => {
                if self.policy == InitialReadPolicy::KeepNewer && state.version != issued_at {
                    tracing::debug!(
                        index = self.index,
                        value,
                        current = state.current,
                        "initial read superseded by a newer mutation"
                    );
                    return;
                }
                state.current = value;
                state.version += 1;
                state.status = SyncStatus::Synced;
                self.changes.send_replace(value);
            }
            Err(err) => {
                tracing::warn!(index = self.index, error = %err, "getParameter failed");
                // A write or push since the read was issued owns the status.
                if state.version == issued_at && state.status == SyncStatus::Initializing {
                    state.status = SyncStatus::ReadFailed(HostCallFailure::from_error(
                        HostOp::GetParameter,
                        self.index,
                        &err,
                    ));
                }
            }
        }
    }

    /// Apply a host-originated value. Never calls back into the host.
    pub fn apply_push(&self, value: ParameterValue) {
        if !self.is_live() {
            return;
        }
        let mut state = self.state.write();
        state.current = value;
        state.version += 1;
        state.status = SyncStatus::Synced;
        self.changes.send_replace(value);
    }

    /// Optimistically set the value and forward it to the host.
    pub fn write(self: &Arc<Self>, value: ParameterValue) -> PendingWrite {
        if !self.is_live() {
            return PendingWrite::resolved(Err(BridgeError::SessionClosed));
        }

        let version = {
            let mut state = self.state.write();
            state.current = value;
            state.version += 1;
            self.changes.send_replace(value);
            state.version
        };

        let call = self.host.set_parameter(self.index, value);
        let (tx, rx) = oneshot::channel();
        let cell = Arc::clone(self);
        self.runtime.spawn(async move {
            let result = with_timeout(call, cell.timeout, HostOp::SetParameter, cell.index).await;
            cell.complete_write(version, &result);
            let _ = tx.send(result);
        });

        PendingWrite { rx }
    }

    fn complete_write(&self, version: u64, result: &Result<()>) {
        if !self.is_live() {
            tracing::debug!(index = self.index, "session closed, discarding write ack");
            return;
        }
        if let Err(err) = result {
            tracing::warn!(index = self.index, error = %err, "setParameter failed");
        }

        let mut state = self.state.write();
        // A newer write or push owns the status now.
        if state.version != version {
            return;
        }
        state.status = match result {
            Ok(()) => SyncStatus::Synced,
            Err(err) => SyncStatus::WriteFailed(HostCallFailure::from_error(
                HostOp::SetParameter,
                self.index,
                err,
            )),
        };
    }
}

impl std::fmt::Debug for SyncCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("SyncCell")
            .field("index", &self.index)
            .field("current", &state.current)
            .field("version", &state.version)
            .field("status", &state.status)
            .finish()
    }
}
