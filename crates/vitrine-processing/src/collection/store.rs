use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use vitrine_core::ItemId;

use super::reducer::{ListAction, MediaList, Transition};
use super::MediaItem;
use crate::upload::ProgressTarget;

struct ListState {
    list: MediaList,
    /// Progress for items built by an in-flight batch, applied at commit
    pending: HashMap<ItemId, u8>,
}

/// Shared, lock-protected list state.
///
/// The lock is only held for a single reduction; it is never held across an await.
pub(crate) struct ListStore {
    state: Mutex<ListState>,
}

impl ListStore {
    pub(crate) fn new(list: MediaList) -> Self {
        Self {
            state: Mutex::new(ListState {
                list,
                pending: HashMap::new(),
            }),
        }
    }

    /// A poisoned lock is recovered; every reduction leaves the state consistent.
    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn dispatch(&self, action: ListAction) -> Transition {
        self.lock().list.apply(action)
    }

    /// Append a batch, folding in any progress that arrived while it was being built.
    pub(crate) fn commit(&self, mut items: Vec<MediaItem>) -> Transition {
        let mut state = self.lock();
        for item in items.iter_mut() {
            if let Some(pct) = state.pending.remove(&item.id()) {
                item.set_progress(pct);
            }
        }
        state.list.apply(ListAction::Added(items))
    }

    pub(crate) fn register_pending(&self, id: ItemId) {
        self.lock().pending.insert(id, 0);
    }

    pub(crate) fn discard_pending(&self, ids: &[ItemId]) {
        let mut state = self.lock();
        for id in ids {
            state.pending.remove(id);
        }
    }

    pub(crate) fn remaining(&self) -> Option<usize> {
        self.lock().list.remaining()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().list.len()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&MediaList) -> R) -> R {
        f(&self.lock().list)
    }
}

impl ProgressTarget for ListStore {
    fn apply_progress(&self, id: ItemId, pct: u8) -> bool {
        let mut state = self.lock();
        if state.list.contains(id) {
            state.list.apply(ListAction::Progress { id, pct });
            return true;
        }
        match state.pending.get_mut(&id) {
            Some(pending) => {
                *pending = pct;
                true
            }
            None => false,
        }
    }
}

/// Tracks the pending ids of one add batch and forgets them when the batch ends,
/// including when the add future is dropped before committing.
pub(crate) struct BatchGuard {
    store: Arc<ListStore>,
    ids: Vec<ItemId>,
}

impl BatchGuard {
    pub(crate) fn new(store: Arc<ListStore>) -> Self {
        Self {
            store,
            ids: Vec::new(),
        }
    }

    pub(crate) fn register(&mut self, id: ItemId) {
        self.store.register_pending(id);
        self.ids.push(id);
    }
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        if !self.ids.is_empty() {
            self.store.discard_pending(&self.ids);
        }
    }
}
