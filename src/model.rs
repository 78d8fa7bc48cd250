//! Observable ordered collections.
//!
//! Presentation layers consume asynchronous results through an
//! index-addressable collection interface with change notifications,
//! independent of any widget toolkit. [`VecModel`] is the concrete base
//! collection; [`promise_model::PromiseListModel`] binds one slot of a base
//! collection to a pending [`crate::promise::Promise`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

pub mod promise_model;
pub mod vec_model;

pub use promise_model::{PendingMode, PromiseListModel, Slot};
pub use vec_model::{SlotKey, VecModel};

/// A structural or content change at one index of a list model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Inserted { index: usize },
    Removed { index: usize },
    Changed { index: usize },
}

/// Identifier handed out by [`ListModel::subscribe`].
pub type ObserverId = u64;

type ObserverFn = Arc<dyn Fn(&ListChange) + Send + Sync>;

/// Ordered observer list shared by the list model implementations.
///
/// Observers are notified in subscription order. Notification happens
/// outside the owning model's locks, so an observer may read the model it
/// observes.
#[derive(Default)]
pub struct Observers {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ObserverId, ObserverFn)>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: ObserverFn) -> ObserverId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) {
        self.entries.lock().retain(|(entry_id, _)| *entry_id != id);
    }

    pub fn emit(&self, change: &ListChange) {
        let snapshot: Vec<ObserverFn> = self
            .entries
            .lock()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in snapshot {
            observer(change);
        }
    }
}

/// Index-addressable, observable, ordered collection.
pub trait ListModel<T>: Send + Sync {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<T>;

    /// Subscribe to change notifications; observers fire in subscription
    /// order.
    fn subscribe(&self, observer: Arc<dyn Fn(&ListChange) + Send + Sync>) -> ObserverId;

    fn unsubscribe(&self, id: ObserverId);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
