//! Push notification sink, the host's way in.

use crate::session::SessionShared;
use crate::types::{ParameterIndex, ParameterValue};
use std::sync::{Arc, Weak};

/// Entry point the host calls when a parameter changed outside the UI.
///
/// Obtained once per session from
/// [`BridgeSession::install_push_sink`](crate::BridgeSession::install_push_sink).
/// Calls are synchronous, never touch the host and never panic. Clone is cheap.
#[derive(Clone)]
pub struct PushSink {
    shared: Arc<SessionShared>,
}

/// Non-owning form of a [`PushSink`], for transports that outlive the
/// session or are owned by it.
#[derive(Clone)]
pub struct WeakPushSink {
    shared: Weak<SessionShared>,
}

impl WeakPushSink {
    /// `None` once the session has been dropped.
    pub fn upgrade(&self) -> Option<PushSink> {
        self.shared.upgrade().map(PushSink::new)
    }
}

impl PushSink {
    pub(crate) fn new(shared: Arc<SessionShared>) -> Self {
        Self { shared }
    }

    pub fn downgrade(&self) -> WeakPushSink {
        WeakPushSink {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Route a host change to the cell registered for `index`.
    ///
    /// Returns `false` if the notification was dropped: no cell for the index
    /// exists yet, or the session is closed. Dropped notifications are not queued.
    pub fn parameter_changed(&self, index: ParameterIndex, value: ParameterValue) -> bool {
        if !self.shared.is_open() {
            tracing::trace!(index, value, "session closed, dropping push");
            return false;
        }
        match self.shared.registry.get(index) {
            Some(cell) => {
                cell.apply_push(value);
                true
            }
            None => {
                tracing::trace!(index, value, "no cell registered, dropping push");
                false
            }
        }
    }

    /// The sink as a plain callback, for hosts that store `Fn(index, value)`.
    pub fn into_callback(self) -> impl Fn(ParameterIndex, ParameterValue) + Send + Sync + 'static {
        move |index, value| {
            self.parameter_changed(index, value);
        }
    }
}

impl std::fmt::Debug for PushSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushSink")
            .field("open", &self.shared.is_open())
            .finish()
    }
}
