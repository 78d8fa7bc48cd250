//! Shared fixtures for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use atelier::context::contextual::Contextual;
use atelier::context::Context;
use atelier::error::{HostError, Rejection};
use atelier::model::VecModel;
use atelier::provider::sdk::{Sdk, SdkProvider};
use atelier::provider::{Lifecycle, Provider};
use atelier::registry::CapabilityKind;
use atelier::settings::Settings;

pub fn fresh_context() -> Arc<Context> {
    Context::new(std::env::temp_dir(), Settings::default()).unwrap()
}

/// A fake build environment discovered by [`RecordingSdkProvider`].
pub struct FakeSdk {
    pub id: String,
}

impl Sdk for FakeSdk {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> String {
        format!("Fake SDK {}", self.id)
    }

    fn flavor(&self) -> String {
        "container".to_string()
    }

    fn installed(&self) -> bool {
        true
    }
}

/// An SDK provider that records lifecycle events and discovers one fake
/// SDK during load. Load can be made slow or failing to exercise fan-in
/// and error paths.
pub struct RecordingSdkProvider {
    contextual: Contextual,
    lifecycle: Lifecycle,
    identity: String,
    sdks: Arc<VecModel<Arc<dyn Sdk>>>,
    pub load_delay: Duration,
    pub fail_load: bool,
    pub fail_unload: bool,
    pub events: Arc<Mutex<Vec<String>>>,
}

impl RecordingSdkProvider {
    pub fn new(context: &Arc<Context>, identity: &str, events: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            contextual: Contextual::new(context),
            lifecycle: Lifecycle::new(),
            identity: identity.to_string(),
            sdks: Arc::new(VecModel::new()),
            load_delay: Duration::ZERO,
            fail_load: false,
            fail_unload: false,
            events,
        }
    }
}

#[async_trait]
impl Provider for RecordingSdkProvider {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::SDK_PROVIDER
    }

    fn identity(&self) -> String {
        self.identity.clone()
    }

    fn contextual(&self) -> &Contextual {
        &self.contextual
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    async fn load(&self) -> Result<(), Rejection> {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        self.events
            .lock()
            .unwrap()
            .push(format!("load:{}", self.identity));
        if self.fail_load {
            return Err(HostError::Backend(anyhow!("discovery backend unreachable"))
                .into_rejection());
        }
        self.sdk_added(Arc::new(FakeSdk {
            id: format!("{}-sdk", self.identity),
        }));
        Ok(())
    }

    async fn unload(&self) -> Result<(), Rejection> {
        self.events
            .lock()
            .unwrap()
            .push(format!("unload:{}", self.identity));
        if self.fail_unload {
            return Err(HostError::Backend(anyhow!("teardown stuck")).into_rejection());
        }
        Ok(())
    }
}

impl SdkProvider for RecordingSdkProvider {
    fn sdk_model(&self) -> &Arc<VecModel<Arc<dyn Sdk>>> {
        &self.sdks
    }
}
