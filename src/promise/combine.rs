//! Fan-out/fan-in combinators over promises.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use parking_lot::Mutex;

use crate::error::HostError;
use crate::promise::Promise;

/// Resolve when every input resolves, with values in input order.
///
/// Rejects with the first observed rejection without waiting for the
/// remaining inputs (fail-fast), advisorily cancelling them. An empty input
/// resolves immediately with an empty vector.
pub fn all<T>(promises: Vec<Promise<T>>) -> Promise<Vec<T>>
where
    T: Clone + Send + 'static,
{
    let combined = Promise::new();
    if promises.is_empty() {
        let _ = combined.resolve(Vec::new());
        return combined;
    }

    let total = promises.len();
    let slots: Arc<Mutex<Vec<Option<T>>>> =
        Arc::new(Mutex::new((0..total).map(|_| None).collect()));
    let remaining = Arc::new(AtomicUsize::new(total));
    let peers = Arc::new(promises.clone());

    for (index, promise) in promises.iter().enumerate() {
        let combined = combined.clone();
        let slots = Arc::clone(&slots);
        let remaining = Arc::clone(&remaining);
        let peers = Arc::clone(&peers);

        promise.on_settled(move |outcome| match outcome {
            Ok(value) => {
                slots.lock()[index] = Some(value.clone());
                if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                    let values: Vec<T> = slots
                        .lock()
                        .iter_mut()
                        .map(|slot| slot.take().expect("every input has resolved"))
                        .collect();
                    let _ = combined.resolve(values);
                }
            }
            Err(rejection) => {
                // First rejection wins; the rest are asked to stand down
                // before the combined rejection becomes observable.
                for peer in peers.iter() {
                    peer.cancel();
                }
                let _ = combined.reject_with(Arc::clone(rejection));
            }
        });
    }

    combined
}

/// Resolve with the first input to resolve; reject only after every input
/// has rejected (with the last observed rejection).
///
/// Which input wins among near-simultaneous completions depends on the
/// order completion events are delivered and is not deterministic across
/// runs. Callers must not rely on a canonical winner.
pub fn any<T>(promises: Vec<Promise<T>>) -> Promise<T>
where
    T: Clone + Send + 'static,
{
    let combined = Promise::new();
    if promises.is_empty() {
        let _ = combined.reject(HostError::Backend(anyhow!(
            "any() requires at least one promise"
        )));
        return combined;
    }

    let remaining = Arc::new(AtomicUsize::new(promises.len()));

    for promise in &promises {
        let combined = combined.clone();
        let remaining = Arc::clone(&remaining);

        promise.on_settled(move |outcome| match outcome {
            Ok(value) => {
                let _ = combined.resolve(value.clone());
            }
            Err(rejection) => {
                if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                    let _ = combined.reject_with(Arc::clone(rejection));
                }
            }
        });
    }

    combined
}

/// Derive a promise that rejects with [`HostError::TimedOut`] unless the
/// input settles within `duration`.
///
/// The input is not cancelled by the timeout; callers holding the original
/// handle may still observe its eventual settlement.
///
/// Must be called from within a tokio runtime.
pub fn timeout<T>(promise: &Promise<T>, duration: Duration) -> Promise<T>
where
    T: Clone + Send + 'static,
{
    let combined = Promise::new();

    let producer = combined.clone();
    promise.on_settled(move |outcome| {
        let _ = producer.settle(outcome.clone());
    });

    let deadline = combined.clone();
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        let _ = deadline.reject(HostError::TimedOut);
    });

    combined
}
