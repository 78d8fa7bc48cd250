//! Lifecycle behavior across load failures and teardown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use atelier::error::HostError;
use atelier::provider::sdk::SdkProvider;
use atelier::provider::{Provider, ProviderState};
use atelier::registry::CapabilityKind;

use super::test_utils::{fresh_context, RecordingSdkProvider};

#[tokio::test]
async fn failed_load_leaves_provider_not_ready() {
    let context = fresh_context();
    let events = Arc::new(Mutex::new(Vec::new()));

    let mut flaky = RecordingSdkProvider::new(&context, "flaky", events.clone());
    flaky.fail_load = true;
    let flaky: Arc<dyn SdkProvider> = Arc::new(flaky);
    context.registry().register(flaky.clone()).unwrap();

    // The fan-in surfaces the failure.
    assert!(context.start().await.is_err());

    // The provider stays non-ready; capability operations keep failing
    // with NotReady instead of crashing the session.
    assert_eq!(flaky.lifecycle().state(), ProviderState::Unloaded);
    assert!(matches!(flaky.sdks(), Err(HostError::NotReady { .. })));

    // when_ready carries the load failure for interested observers.
    let rejection = flaky.lifecycle().when_ready().wait().await.unwrap_err();
    assert!(matches!(*rejection, HostError::Backend(_)));

    // Built-ins are unaffected by the plugin failure.
    for provider in context.registry().list(&CapabilityKind::DEVICE) {
        provider.lifecycle().when_ready().wait().await.unwrap();
        assert_eq!(provider.lifecycle().state(), ProviderState::Loaded);
    }
}

#[tokio::test]
async fn when_ready_resolves_on_successful_load() {
    let context = fresh_context();
    let events = Arc::new(Mutex::new(Vec::new()));

    let mut slow = RecordingSdkProvider::new(&context, "slow", events);
    slow.load_delay = Duration::from_millis(20);
    let slow: Arc<dyn SdkProvider> = Arc::new(slow);
    context.registry().register(slow.clone()).unwrap();

    let ready = slow.lifecycle().when_ready();
    assert!(ready.is_pending());

    context.start().await.unwrap();
    assert!(ready.wait().await.is_ok());
    assert_eq!(slow.lifecycle().state(), ProviderState::Loaded);
}

#[tokio::test]
async fn shutdown_unloads_in_reverse_and_collects_failures() {
    let context = fresh_context();
    let events = Arc::new(Mutex::new(Vec::new()));

    let first: Arc<dyn SdkProvider> = Arc::new(RecordingSdkProvider::new(
        &context,
        "first",
        events.clone(),
    ));
    let mut stuck = RecordingSdkProvider::new(&context, "stuck", events.clone());
    stuck.fail_unload = true;
    let stuck: Arc<dyn SdkProvider> = Arc::new(stuck);

    context.registry().register(first.clone()).unwrap();
    context.registry().register(stuck.clone()).unwrap();
    context.start().await.unwrap();
    events.lock().unwrap().clear();

    let err = context.shutdown().await.unwrap_err();
    match err {
        HostError::UnloadIncomplete { failures } => assert_eq!(failures.len(), 1),
        other => panic!("unexpected error: {other:?}"),
    }

    // Registered after the built-ins, so unloaded before them, in reverse
    // registration order; the stuck provider did not stop the other.
    assert_eq!(
        *events.lock().unwrap(),
        vec!["unload:stuck", "unload:first"]
    );
    assert_eq!(first.lifecycle().state(), ProviderState::Unloaded);
    assert_eq!(stuck.lifecycle().state(), ProviderState::Unloaded);

    // The unload promises settled accordingly.
    assert!(first.lifecycle().when_unloaded().wait().await.is_ok());
    assert!(stuck.lifecycle().when_unloaded().wait().await.is_err());
}
