//! Bridge session owning the registry, the push sink and the host handle.
//!
//! One session corresponds to one UI instance. Nothing here is global: two
//! sessions (two editor windows, or two tests) never see each other's cells.

use crate::binding::ParameterBinding;
use crate::cell::{CellContext, SyncCell};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::host::HostCalls;
use crate::registry::CellRegistry;
use crate::sink::PushSink;
use crate::types::ParameterIndex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;

pub(crate) struct SessionShared {
    pub registry: CellRegistry,
    pub ctx: CellContext,
    sink_installed: AtomicBool,
}

impl SessionShared {
    pub fn is_open(&self) -> bool {
        self.ctx.open.load(Ordering::Acquire)
    }
}

/// Per-UI bridge context. Clone is cheap (Arc-based).
#[derive(Clone)]
pub struct BridgeSession {
    shared: Arc<SessionShared>,
}

impl BridgeSession {
    /// Create a session whose host calls run on `runtime`.
    pub fn new(host: Arc<dyn HostCalls>, runtime: Handle, config: BridgeConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(?config, "bridge session opened");

        Ok(Self {
            shared: Arc::new(SessionShared {
                registry: CellRegistry::new(),
                ctx: CellContext {
                    host,
                    runtime,
                    config,
                    open: Arc::new(AtomicBool::new(true)),
                },
                sink_installed: AtomicBool::new(false),
            }),
        })
    }

    /// Create a session on the tokio runtime the caller is running in.
    pub fn with_current_runtime(host: Arc<dyn HostCalls>, config: BridgeConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| BridgeError::NoRuntime(e.to_string()))?;
        Self::new(host, runtime, config)
    }

    /// Binding for `index`, backed by the session's single cell for that index.
    ///
    /// The first bind for an index creates the cell and issues its
    /// `getParameter` call; later binds share that cell.
    pub fn bind(&self, index: ParameterIndex) -> Result<ParameterBinding> {
        if !self.shared.is_open() {
            return Err(BridgeError::SessionClosed);
        }

        let (cell, created) = self
            .shared
            .registry
            .get_or_insert_with(index, || SyncCell::new(index, &self.shared.ctx));
        if created {
            tracing::debug!(index, "sync cell created");
            cell.initialize();
        }

        Ok(ParameterBinding::new(cell))
    }

    /// Hand out the entry point the host calls on external parameter changes.
    ///
    /// Succeeds once per session.
    pub fn install_push_sink(&self) -> Result<PushSink> {
        if !self.shared.is_open() {
            return Err(BridgeError::SessionClosed);
        }
        if self.shared.sink_installed.swap(true, Ordering::AcqRel) {
            return Err(BridgeError::SinkAlreadyInstalled);
        }
        Ok(PushSink::new(Arc::clone(&self.shared)))
    }

    pub fn cell(&self, index: ParameterIndex) -> Option<Arc<SyncCell>> {
        self.shared.registry.get(index)
    }

    pub fn registered_indices(&self) -> Vec<ParameterIndex> {
        self.shared.registry.indices()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.shared.ctx.config
    }

    pub fn is_open(&self) -> bool {
        self.shared.is_open()
    }

    /// Close the session. Pushes, binds and writes are refused afterwards and
    /// host answers still in flight are discarded.
    pub fn shutdown(&self) {
        if self.shared.ctx.open.swap(false, Ordering::AcqRel) {
            let cells = self.shared.registry.len();
            self.shared.registry.clear();
            tracing::info!(cells, "bridge session closed");
        }
    }
}

impl std::fmt::Debug for BridgeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeSession")
            .field("open", &self.is_open())
            .field("indices", &self.registered_indices())
            .finish()
    }
}
