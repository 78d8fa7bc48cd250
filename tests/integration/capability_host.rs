//! End-to-end coverage of context startup and capability enumeration.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use atelier::model::ListModel;
use atelier::provider::device::Device;
use atelier::provider::sdk::{Sdk, SdkProvider};
use atelier::provider::{Provider, ProviderState};
use atelier::registry::CapabilityKind;

use super::test_utils::{fresh_context, RecordingSdkProvider};

#[tokio::test]
async fn sdk_providers_load_and_enumerate() {
    let context = fresh_context();
    let events = Arc::new(Mutex::new(Vec::new()));

    let provider_a: Arc<dyn SdkProvider> = Arc::new(RecordingSdkProvider::new(
        &context,
        "alpha",
        events.clone(),
    ));
    let provider_b: Arc<dyn SdkProvider> = Arc::new(RecordingSdkProvider::new(
        &context,
        "beta",
        events.clone(),
    ));
    context.registry().register(provider_a).unwrap();
    context.registry().register(provider_b).unwrap();

    context.start().await.unwrap();

    // Both registered providers loaded, along with the built-in.
    let identities: BTreeSet<String> = context
        .registry()
        .list(&CapabilityKind::SDK_PROVIDER)
        .iter()
        .map(|provider| provider.identity())
        .collect();
    assert_eq!(
        identities,
        ["host", "alpha", "beta"]
            .into_iter()
            .map(String::from)
            .collect()
    );

    for provider in context.registry().list(&CapabilityKind::SDK_PROVIDER) {
        assert_eq!(provider.lifecycle().state(), ProviderState::Loaded);
    }

    // The host device exists independent of any registered provider.
    let device = context.host_device().expect("host device always present");
    assert_eq!(device.id(), "host");

    // Typed enumeration reaches the discovered SDKs.
    let typed = context
        .registry()
        .list_of::<dyn SdkProvider>(&CapabilityKind::SDK_PROVIDER);
    assert_eq!(typed.len(), 2);
    for provider in typed {
        let sdks = provider.sdks().unwrap();
        assert_eq!(sdks.len(), 1);
        assert!(sdks[0].id().ends_with("-sdk"));
    }
}

#[tokio::test]
async fn host_sdk_is_available_without_plugins() {
    let context = fresh_context();
    context.start().await.unwrap();

    let providers = context
        .registry()
        .list_of::<dyn SdkProvider>(&CapabilityKind::SDK_PROVIDER);
    assert_eq!(providers.len(), 1);

    let host = providers[0].find_sdk("host").unwrap().unwrap();
    assert!(host.installed());
    assert_eq!(host.flavor(), "host");
}

#[tokio::test]
async fn discovery_is_observable_while_loading() {
    let context = fresh_context();
    let events = Arc::new(Mutex::new(Vec::new()));

    let provider = Arc::new(RecordingSdkProvider::new(&context, "slow", events));
    let observed = Arc::new(Mutex::new(0usize));
    let counter = observed.clone();
    provider
        .sdk_model()
        .subscribe(Arc::new(move |_| *counter.lock().unwrap() += 1));

    let handle: Arc<dyn SdkProvider> = provider;
    context.registry().register(handle).unwrap();
    context.start().await.unwrap();

    // One discovery notification from the load hook.
    assert_eq!(*observed.lock().unwrap(), 1);
}
