//! Per-index cell registry.
//!
//! Holds the one canonical cell per parameter index for a session. Bindings
//! and the push sink both resolve cells here, so a push always reaches the
//! same cell every binding for that index reads from.

use crate::cell::SyncCell;
use crate::types::ParameterIndex;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

pub struct CellRegistry<C = SyncCell> {
    cells: DashMap<ParameterIndex, Arc<C>>,
}

impl<C> Default for CellRegistry<C> {
    fn default() -> Self {
        Self {
            cells: DashMap::new(),
        }
    }
}

impl<C> CellRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: ParameterIndex) -> Option<Arc<C>> {
        self.cells.get(&index).map(|entry| Arc::clone(entry.value()))
    }

    /// Look up the cell for `index`, creating it with `make` if absent.
    ///
    /// The flag is `true` only for the call that created the cell.
    pub fn get_or_insert_with(
        &self,
        index: ParameterIndex,
        make: impl FnOnce() -> C,
    ) -> (Arc<C>, bool) {
        match self.cells.entry(index) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                let cell = Arc::new(make());
                entry.insert(Arc::clone(&cell));
                (cell, true)
            }
        }
    }

    pub fn contains(&self, index: ParameterIndex) -> bool {
        self.cells.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Registered indices in ascending order.
    pub fn indices(&self) -> Vec<ParameterIndex> {
        let mut indices: Vec<_> = self.cells.iter().map(|entry| *entry.key()).collect();
        indices.sort_unstable();
        indices
    }

    pub fn clear(&self) {
        self.cells.clear();
    }
}
