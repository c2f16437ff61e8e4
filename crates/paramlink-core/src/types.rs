//! Shared value types.

use crate::error::{BridgeError, HostOp};

/// Integer identifier naming one host-owned value.
pub type ParameterIndex = u32;

/// Host-defined numeric value. Opaque to the bridge: never validated or clamped.
pub type ParameterValue = f64;

/// A recorded host call failure, kept as observable cell state.
///
/// Unlike [`BridgeError`] this is `Clone`, so it can be handed to every
/// consumer that polls a binding's status.
#[derive(Debug, Clone, PartialEq)]
pub struct HostCallFailure {
    pub op: HostOp,
    pub index: ParameterIndex,
    pub reason: String,
}

impl HostCallFailure {
    pub fn from_error(op: HostOp, index: ParameterIndex, err: &BridgeError) -> Self {
        Self {
            op,
            index,
            reason: err.to_string(),
        }
    }
}

impl std::fmt::Display for HostCallFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}): {}", self.op, self.index, self.reason)
    }
}

/// Reconciliation state of a sync cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SyncStatus {
    /// The initial `getParameter` call has not completed yet.
    #[default]
    Initializing,
    /// The last host interaction succeeded, or a push delivered the host's value.
    Synced,
    /// The initial read failed; the cell still holds its placeholder.
    ReadFailed(HostCallFailure),
    /// The latest write was not acknowledged; the optimistic value stays in place.
    WriteFailed(HostCallFailure),
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced)
    }

    pub fn failure(&self) -> Option<&HostCallFailure> {
        match self {
            SyncStatus::ReadFailed(f) | SyncStatus::WriteFailed(f) => Some(f),
            _ => None,
        }
    }
}
