//! Single-assignment observable result cells.
//!
//! A [`Promise`] represents the outcome of an in-flight asynchronous
//! operation: pending, resolved with a value, or rejected with a
//! [`Rejection`]. Settlement is one-way and happens exactly once; every
//! continuation and waiter observes the same terminal outcome. Handles are
//! reference-counted, so producers and any number of consumers share the
//! cell without a single owner.

use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::{HostError, Rejection};

pub mod combine;

/// Terminal outcome of a promise.
pub type Outcome<T> = Result<T, Rejection>;

type Continuation<T> = Box<dyn FnOnce(&Outcome<T>) + Send>;
type CancelHook = Box<dyn FnOnce() + Send>;

enum State<T> {
    Pending {
        continuations: Vec<Continuation<T>>,
        cancel_hooks: Vec<CancelHook>,
        cancel_requested: bool,
    },
    Settled(Outcome<T>),
}

struct Cell<T> {
    state: Mutex<State<T>>,
}

/// A cloneable handle to a single-assignment asynchronous result cell.
pub struct Promise<T> {
    cell: Arc<Cell<T>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Promise<T> {
    /// Create a pending promise.
    pub fn new() -> Self {
        Self {
            cell: Arc::new(Cell {
                state: Mutex::new(State::Pending {
                    continuations: Vec::new(),
                    cancel_hooks: Vec::new(),
                    cancel_requested: false,
                }),
            }),
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(*self.cell.state.lock(), State::Settled(_))
    }

    pub fn is_pending(&self) -> bool {
        !self.is_settled()
    }

    /// Whether cancellation has been requested but not yet honored.
    ///
    /// Returns `false` once the promise has settled.
    pub fn is_cancel_requested(&self) -> bool {
        match &*self.cell.state.lock() {
            State::Pending {
                cancel_requested, ..
            } => *cancel_requested,
            State::Settled(_) => false,
        }
    }

    /// Request cooperative cancellation.
    ///
    /// Cancellation is advisory: producer-registered [`Promise::on_cancel`]
    /// hooks fire exactly once, but the promise stays pending until the
    /// producer honors the request (conventionally by rejecting with
    /// [`HostError::Cancelled`]) or the operation completes anyway.
    pub fn cancel(&self) {
        let hooks = {
            let mut state = self.cell.state.lock();
            match &mut *state {
                State::Pending {
                    cancel_hooks,
                    cancel_requested,
                    ..
                } => {
                    if *cancel_requested {
                        return;
                    }
                    *cancel_requested = true;
                    std::mem::take(cancel_hooks)
                }
                State::Settled(_) => return,
            }
        };
        for hook in hooks {
            hook();
        }
    }

    /// Register a producer-side hook invoked when cancellation is requested.
    ///
    /// If cancellation was already requested the hook runs immediately; if
    /// the promise has settled the hook is dropped without running.
    pub fn on_cancel<F>(&self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let hook: CancelHook = Box::new(hook);
        {
            let mut state = self.cell.state.lock();
            match &mut *state {
                State::Pending {
                    cancel_hooks,
                    cancel_requested,
                    ..
                } => {
                    if !*cancel_requested {
                        cancel_hooks.push(hook);
                        return;
                    }
                }
                State::Settled(_) => return,
            }
        }
        hook();
    }
}

impl<T> Promise<T>
where
    T: Clone + Send + 'static,
{
    /// Create a promise already resolved with `value`.
    pub fn resolved(value: T) -> Self {
        Self {
            cell: Arc::new(Cell {
                state: Mutex::new(State::Settled(Ok(value))),
            }),
        }
    }

    /// Create a promise already rejected with `error`.
    pub fn rejected(error: HostError) -> Self {
        Self {
            cell: Arc::new(Cell {
                state: Mutex::new(State::Settled(Err(Arc::new(error)))),
            }),
        }
    }

    /// Run `future` on the tokio runtime and settle this promise with its
    /// output. This is the bridge between `async` provider bodies and the
    /// observable cell handed to consumers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: std::future::Future<Output = Outcome<T>> + Send + 'static,
    {
        let promise = Self::new();
        let producer = promise.clone();
        tokio::spawn(async move {
            let outcome = future.await;
            let _ = producer.settle(outcome);
        });
        promise
    }

    /// Settle with an already-formed outcome.
    ///
    /// Fails with [`HostError::AlreadySettled`] on the second and any later
    /// attempt; the stored outcome is never replaced.
    pub fn settle(&self, outcome: Outcome<T>) -> Result<(), HostError> {
        let previous = {
            let mut state = self.cell.state.lock();
            if matches!(&*state, State::Settled(_)) {
                return Err(HostError::AlreadySettled);
            }
            std::mem::replace(&mut *state, State::Settled(outcome.clone()))
        };
        let continuations = match previous {
            State::Pending { continuations, .. } => continuations,
            State::Settled(_) => Vec::new(),
        };
        // Continuations run outside the lock, in registration order.
        for continuation in continuations {
            continuation(&outcome);
        }
        Ok(())
    }

    /// Resolve with `value`. See [`Promise::settle`] for double-settlement
    /// behavior.
    pub fn resolve(&self, value: T) -> Result<(), HostError> {
        self.settle(Ok(value))
    }

    /// Reject with `error`. See [`Promise::settle`] for double-settlement
    /// behavior.
    pub fn reject(&self, error: HostError) -> Result<(), HostError> {
        self.settle(Err(Arc::new(error)))
    }

    /// Reject with a shared rejection observed elsewhere.
    pub fn reject_with(&self, rejection: Rejection) -> Result<(), HostError> {
        self.settle(Err(rejection))
    }

    /// Non-blocking snapshot of the settled outcome, if any.
    pub fn try_get(&self) -> Option<Outcome<T>> {
        match &*self.cell.state.lock() {
            State::Settled(outcome) => Some(outcome.clone()),
            State::Pending { .. } => None,
        }
    }

    /// Register a callback fired with the terminal outcome.
    ///
    /// Callbacks registered before settlement run at settlement time in
    /// registration order; a callback registered after settlement runs
    /// immediately on the calling thread.
    pub(crate) fn on_settled<F>(&self, callback: F)
    where
        F: FnOnce(&Outcome<T>) + Send + 'static,
    {
        let callback: Continuation<T> = Box::new(callback);
        let outcome = {
            let mut state = self.cell.state.lock();
            match &mut *state {
                State::Pending { continuations, .. } => {
                    continuations.push(callback);
                    return;
                }
                State::Settled(outcome) => outcome.clone(),
            }
        };
        callback(&outcome);
    }

    /// Chain a continuation, producing a new promise for its outcome.
    ///
    /// The continuation receives the terminal outcome of `self` and its
    /// return value settles the derived promise, so chains propagate both
    /// values and rejections.
    pub fn then<U, F>(&self, continuation: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(Outcome<T>) -> Outcome<U> + Send + 'static,
    {
        let next = Promise::new();
        let producer = next.clone();
        self.on_settled(move |outcome| {
            let _ = producer.settle(continuation(outcome.clone()));
        });
        next
    }

    /// Suspend until the promise settles and return the terminal outcome.
    ///
    /// If every producer handle is dropped while the promise is still
    /// pending, waiters observe [`HostError::Cancelled`].
    pub async fn wait(&self) -> Outcome<T> {
        if let Some(outcome) = self.try_get() {
            return outcome;
        }
        let (tx, rx) = oneshot::channel();
        self.on_settled(move |outcome| {
            let _ = tx.send(outcome.clone());
        });
        match rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(Arc::new(HostError::Cancelled)),
        }
    }
}

impl<T> IntoFuture for Promise<T>
where
    T: Clone + Send + 'static,
{
    type Output = Outcome<T>;
    type IntoFuture = BoxFuture<'static, Outcome<T>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.wait().await })
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.cell.state.lock() {
            State::Pending { .. } => "pending",
            State::Settled(Ok(_)) => "resolved",
            State::Settled(Err(_)) => "rejected",
        };
        f.debug_struct("Promise").field("state", &state).finish()
    }
}
