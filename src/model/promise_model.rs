//! List model with one slot bound to a pending promise.
//!
//! Wraps a base [`VecModel`] whose items are [`Slot`]s and binds a single
//! pending slot to a [`Promise`]. The slot is tracked by identity, not raw
//! index, so structural mutation of the base collection while the promise
//! is in flight never corrupts the bookkeeping. The binding is consumed at
//! settlement; the base model lives on independently.

use std::sync::Arc;

use crate::model::{ListChange, ListModel, ObserverId, SlotKey, VecModel};
use crate::promise::Promise;

/// Item of a promise-backed list model: either the placeholder for the
/// in-flight result or a materialized value.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    Pending,
    Ready(T),
}

impl<T> Slot<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Slot::Ready(value) => Some(value),
            Slot::Pending => None,
        }
    }
}

/// How the pending slot participates in enumeration before settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingMode {
    /// The slot enumerates as [`Slot::Pending`] from construction. On
    /// resolve it is replaced in place with exactly one `Changed`
    /// notification; on reject it is removed with exactly one `Removed`
    /// notification.
    Placeholder,
    /// The slot is absent from enumeration until the promise resolves,
    /// which inserts it with one `Inserted` notification. Rejection leaves
    /// the collection untouched.
    Hidden,
}

/// An ordered collection adapter whose one outstanding element materializes
/// when its backing promise settles.
pub struct PromiseListModel<T> {
    base: Arc<VecModel<Slot<T>>>,
    bound: Promise<T>,
}

impl<T> PromiseListModel<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Bind `promise` to a slot of `base` at `position`.
    ///
    /// The slot's placement is fixed at construction. With
    /// [`PendingMode::Placeholder`] the placeholder appears immediately but
    /// produces no structural notification until the promise settles;
    /// indices of all other items are unaffected by the slot's resolution.
    ///
    /// Panics if `position` exceeds the base collection's current length.
    pub fn new(
        base: Arc<VecModel<Slot<T>>>,
        promise: Promise<T>,
        position: usize,
        mode: PendingMode,
    ) -> Arc<Self> {
        match mode {
            PendingMode::Placeholder => {
                let key = base.insert_silent(position, Slot::Pending);
                let slot_model = Arc::clone(&base);
                promise.on_settled(move |outcome| {
                    settle_placeholder(&slot_model, key, outcome.as_ref().ok().cloned());
                });
            }
            PendingMode::Hidden => {
                let slot_model = Arc::clone(&base);
                promise.on_settled(move |outcome| {
                    if let Ok(value) = outcome {
                        let index = position.min(slot_model.len());
                        slot_model.insert(index, Slot::Ready(value.clone()));
                    }
                });
            }
        }

        Arc::new(Self {
            base,
            bound: promise,
        })
    }

    /// Bind to a freshly built base collection of ready items, with the
    /// pending slot appended at the end.
    pub fn with_items(items: Vec<T>, promise: Promise<T>, mode: PendingMode) -> Arc<Self> {
        let base = Arc::new(VecModel::with_items(
            items.into_iter().map(Slot::Ready).collect(),
        ));
        let position = base.len();
        Self::new(base, promise, position, mode)
    }

    /// The bound promise, for callers that want to await or observe the
    /// in-flight result without going through the collection interface.
    pub fn await_bound(&self) -> Promise<T> {
        self.bound.clone()
    }

    /// The wrapped base collection, which remains freely mutable by its
    /// owner for all non-pending slots.
    pub fn base(&self) -> &Arc<VecModel<Slot<T>>> {
        &self.base
    }
}

fn settle_placeholder<T>(model: &VecModel<Slot<T>>, key: SlotKey, resolved: Option<T>)
where
    T: Clone + Send + Sync + 'static,
{
    match resolved {
        Some(value) => {
            model.set_by_key(key, Slot::Ready(value));
        }
        None => {
            model.remove_by_key(key);
        }
    }
}

impl<T> ListModel<Slot<T>> for PromiseListModel<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.base.len()
    }

    fn get(&self, index: usize) -> Option<Slot<T>> {
        self.base.get(index)
    }

    fn subscribe(&self, observer: Arc<dyn Fn(&ListChange) + Send + Sync>) -> ObserverId {
        self.base.subscribe(observer)
    }

    fn unsubscribe(&self, id: ObserverId) {
        self.base.unsubscribe(id);
    }
}
