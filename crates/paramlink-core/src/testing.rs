//! Scripted host used by the unit tests.

use crate::error::{BridgeError, Result};
use crate::host::{HostCalls, HostFuture};
use crate::types::{ParameterIndex, ParameterValue};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::oneshot;

type Reply<T> = oneshot::Sender<Result<T>>;

/// Host whose calls stay pending until the test answers them.
#[derive(Default)]
pub(crate) struct MockHost {
    gets: Mutex<Vec<ParameterIndex>>,
    sets: Mutex<Vec<(ParameterIndex, ParameterValue)>>,
    pending_gets: Mutex<VecDeque<(ParameterIndex, Reply<ParameterValue>)>>,
    pending_sets: Mutex<VecDeque<(ParameterIndex, Reply<()>)>>,
}

impl MockHost {
    pub fn get_calls(&self) -> Vec<ParameterIndex> {
        self.gets.lock().clone()
    }

    pub fn set_calls(&self) -> Vec<(ParameterIndex, ParameterValue)> {
        self.sets.lock().clone()
    }

    /// Answer the oldest pending `getParameter` for `index`.
    pub fn resolve_get(&self, index: ParameterIndex, result: Result<ParameterValue>) {
        let mut pending = self.pending_gets.lock();
        let pos = pending
            .iter()
            .position(|(i, _)| *i == index)
            .expect("no pending getParameter for index");
        if let Some((_, reply)) = pending.remove(pos) {
            let _ = reply.send(result);
        }
    }

    /// Answer the oldest pending `setParameter`.
    pub fn resolve_set(&self, result: Result<()>) {
        let (_, reply) = self
            .pending_sets
            .lock()
            .pop_front()
            .expect("no pending setParameter");
        let _ = reply.send(result);
    }
}

impl HostCalls for MockHost {
    fn get_parameter(&self, index: ParameterIndex) -> HostFuture<ParameterValue> {
        self.gets.lock().push(index);
        let (tx, rx) = oneshot::channel();
        self.pending_gets.lock().push_back((index, tx));
        Box::pin(async move { rx.await.unwrap_or(Err(BridgeError::Disconnected)) })
    }

    fn set_parameter(&self, index: ParameterIndex, value: ParameterValue) -> HostFuture<()> {
        self.sets.lock().push((index, value));
        let (tx, rx) = oneshot::channel();
        self.pending_sets.lock().push_back((index, tx));
        Box::pin(async move { rx.await.unwrap_or(Err(BridgeError::Disconnected)) })
    }
}

/// Let spawned host-call tasks run to their next suspension point.
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
