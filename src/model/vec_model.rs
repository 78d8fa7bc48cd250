//! Vector-backed observable collection with stable entry identities.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::{ListChange, ListModel, ObserverId, Observers};

/// Stable identity of one entry, independent of its current index.
///
/// Keys survive structural mutation elsewhere in the collection, which is
/// what lets a pending slot be tracked while its neighbors come and go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey(u64);

struct Entry<T> {
    key: SlotKey,
    value: T,
}

/// Concrete base collection for the list-model interface.
///
/// Every mutation emits exactly one [`ListChange`] for the affected index;
/// notifications run after the internal lock is released.
pub struct VecModel<T> {
    entries: RwLock<Vec<Entry<T>>>,
    observers: Observers,
    next_key: AtomicU64,
}

impl<T> Default for VecModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> VecModel<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            observers: Observers::new(),
            next_key: AtomicU64::new(1),
        }
    }

    fn mint_key(&self) -> SlotKey {
        SlotKey(self.next_key.fetch_add(1, Ordering::Relaxed))
    }

    /// Current index of the entry with `key`, if it is still present.
    pub fn index_of_key(&self, key: SlotKey) -> Option<usize> {
        self.entries
            .read()
            .iter()
            .position(|entry| entry.key == key)
    }
}

impl<T: Clone + Send + Sync + 'static> VecModel<T> {
    pub fn with_items(items: Vec<T>) -> Self {
        let model = Self::new();
        {
            let mut entries = model.entries.write();
            for value in items {
                let key = model.mint_key();
                entries.push(Entry { key, value });
            }
        }
        model
    }

    /// Insert at `index`, emitting `Inserted`. Panics if `index > len`.
    pub fn insert(&self, index: usize, value: T) -> SlotKey {
        let key = self.insert_silent(index, value);
        self.observers.emit(&ListChange::Inserted { index });
        key
    }

    /// Insert without notifying observers.
    ///
    /// Used for the pending slot of a promise-backed model, which must not
    /// produce a structural notification before its promise settles.
    pub(crate) fn insert_silent(&self, index: usize, value: T) -> SlotKey {
        let key = self.mint_key();
        self.entries.write().insert(index, Entry { key, value });
        key
    }

    /// Append, emitting `Inserted` for the new last index.
    pub fn push(&self, value: T) -> SlotKey {
        let key = self.mint_key();
        let index = {
            let mut entries = self.entries.write();
            entries.push(Entry { key, value });
            entries.len() - 1
        };
        self.observers.emit(&ListChange::Inserted { index });
        key
    }

    /// Remove the entry at `index`, emitting `Removed`. Panics if out of
    /// range.
    pub fn remove(&self, index: usize) -> T {
        let entry = self.entries.write().remove(index);
        self.observers.emit(&ListChange::Removed { index });
        entry.value
    }

    /// Replace the value at `index`, emitting `Changed`. Panics if out of
    /// range.
    pub fn set(&self, index: usize, value: T) {
        {
            let mut entries = self.entries.write();
            entries[index].value = value;
        }
        self.observers.emit(&ListChange::Changed { index });
    }

    /// Replace the entry identified by `key`, emitting `Changed` for its
    /// current index. Returns that index, or `None` if the key is gone.
    pub fn set_by_key(&self, key: SlotKey, value: T) -> Option<usize> {
        let index = {
            let mut entries = self.entries.write();
            let index = entries.iter().position(|entry| entry.key == key)?;
            entries[index].value = value;
            index
        };
        self.observers.emit(&ListChange::Changed { index });
        Some(index)
    }

    /// Remove the entry identified by `key`, emitting `Removed` for its
    /// current index. Returns that index, or `None` if the key is gone.
    pub fn remove_by_key(&self, key: SlotKey) -> Option<usize> {
        let index = {
            let mut entries = self.entries.write();
            let index = entries.iter().position(|entry| entry.key == key)?;
            entries.remove(index);
            index
        };
        self.observers.emit(&ListChange::Removed { index });
        Some(index)
    }

    pub fn iter_snapshot(&self) -> Vec<T> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.value.clone())
            .collect()
    }
}

impl<T: Clone + Send + Sync + 'static> ListModel<T> for VecModel<T> {
    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.entries
            .read()
            .get(index)
            .map(|entry| entry.value.clone())
    }

    fn subscribe(&self, observer: Arc<dyn Fn(&ListChange) + Send + Sync>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    fn unsubscribe(&self, id: ObserverId) {
        self.observers.unsubscribe(id);
    }
}
