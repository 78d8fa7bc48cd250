//! Combinator behavior over promises backed by real async work.

use std::time::Duration;

use atelier::error::HostError;
use atelier::promise::{combine, Promise};

fn delayed(value: u32, delay: Duration) -> Promise<u32> {
    Promise::spawn(async move {
        tokio::time::sleep(delay).await;
        Ok(value)
    })
}

#[tokio::test]
async fn all_preserves_input_order_across_tasks() {
    // The middle task finishes last; order still follows the input.
    let promises = vec![
        delayed(1, Duration::from_millis(5)),
        delayed(2, Duration::from_millis(40)),
        delayed(3, Duration::from_millis(10)),
    ];

    let values = combine::all(promises).wait().await.unwrap();
    assert_eq!(values, vec![1, 2, 3]);
}

#[tokio::test]
async fn all_surfaces_the_first_failure_without_waiting() {
    let quick_failure: Promise<u32> = Promise::spawn(async {
        Err(HostError::TimedOut.into_rejection())
    });
    let never: Promise<u32> = Promise::new();

    let combined = combine::all(vec![quick_failure, never.clone()]);
    let rejection = combined.wait().await.unwrap_err();

    assert!(matches!(*rejection, HostError::TimedOut));
    assert!(never.is_cancel_requested());
}

#[tokio::test]
async fn any_wins_with_a_member_of_the_input() {
    // Near-simultaneous completions: the winner is scheduler-dependent,
    // so assert membership rather than a canonical value.
    let promises = vec![
        delayed(10, Duration::from_millis(2)),
        delayed(20, Duration::from_millis(2)),
    ];

    let winner = combine::any(promises).wait().await.unwrap();
    assert!(winner == 10 || winner == 20);
}

#[tokio::test]
async fn timeout_rejects_slow_work_but_not_the_work_itself() {
    let slow = delayed(7, Duration::from_millis(100));
    let wrapped = combine::timeout(&slow, Duration::from_millis(10));

    let rejection = wrapped.wait().await.unwrap_err();
    assert!(matches!(*rejection, HostError::TimedOut));

    // The underlying operation still completes for holders of the
    // original handle.
    assert_eq!(slow.wait().await.unwrap(), 7);
}

#[tokio::test]
async fn chains_compose_with_fan_in() {
    let base = vec![
        delayed(1, Duration::from_millis(5)),
        delayed(2, Duration::from_millis(5)),
    ];
    let doubled: Vec<Promise<u32>> = base
        .iter()
        .map(|promise| promise.then(|outcome| outcome.map(|v| v * 2)))
        .collect();

    let values = combine::all(doubled).wait().await.unwrap();
    assert_eq!(values, vec![2, 4]);
}
