//! Binding accessor handed to UI code.

use crate::cell::{PendingWrite, SyncCell};
use crate::types::{HostCallFailure, ParameterIndex, ParameterValue, SyncStatus};
use std::sync::Arc;
use tokio::sync::watch;

/// UI-facing read/write handle for one parameter.
/// Clone is cheap (Arc-based); clones and other bindings for the same index share one cell.
#[derive(Clone)]
pub struct ParameterBinding {
    cell: Arc<SyncCell>,
}

impl ParameterBinding {
    pub(crate) fn new(cell: Arc<SyncCell>) -> Self {
        Self { cell }
    }

    pub fn index(&self) -> ParameterIndex {
        self.cell.index()
    }

    pub fn get(&self) -> ParameterValue {
        self.cell.read()
    }

    /// Optimistic write. The returned handle may be dropped (fire-and-forget)
    /// or awaited for the host's acknowledgment.
    pub fn set(&self, value: ParameterValue) -> PendingWrite {
        self.cell.write(value)
    }

    /// Change notifications, for wiring into a UI framework's re-render.
    pub fn subscribe(&self) -> watch::Receiver<ParameterValue> {
        self.cell.subscribe()
    }

    pub fn status(&self) -> SyncStatus {
        self.cell.status()
    }

    pub fn last_error(&self) -> Option<HostCallFailure> {
        self.cell.status().failure().cloned()
    }

    pub fn cell(&self) -> &Arc<SyncCell> {
        &self.cell
    }

    pub fn shares_cell_with(&self, other: &ParameterBinding) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl std::fmt::Debug for ParameterBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterBinding")
            .field("cell", &self.cell)
            .finish()
    }
}
