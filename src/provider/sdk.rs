//! SDK discovery capability.
//!
//! An [`Sdk`] is one build/runtime environment (a container image, a
//! managed toolchain, the host operating system). An [`SdkProvider`]
//! discovers SDKs asynchronously and keeps them in an observable
//! collection so consumers see additions and removals as discovery
//! progresses. The host SDK is always available through a trivial built-in
//! provider requiring no asynchronous setup.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::contextual::Contextual;
use crate::context::Context;
use crate::error::HostError;
use crate::model::{ListModel, VecModel};
use crate::provider::{Lifecycle, Provider};
use crate::registry::CapabilityKind;

/// One build/runtime environment a project can target.
pub trait Sdk: Send + Sync {
    /// Stable identifier, e.g. `host` or `org.example.Sdk//1.0`.
    fn id(&self) -> String;

    /// Human-readable name.
    fn name(&self) -> String;

    /// Flavor of environment, e.g. `host`, `container`, `toolchain`.
    fn flavor(&self) -> String;

    /// Whether the environment is installed and usable right now.
    fn installed(&self) -> bool;
}

/// Discovers SDKs of one flavor for a context.
pub trait SdkProvider: Provider {
    /// Observable collection of discovered SDKs. Observers see one change
    /// notification per addition/removal.
    fn sdk_model(&self) -> &Arc<VecModel<Arc<dyn Sdk>>>;

    /// Snapshot of the currently discovered SDKs.
    ///
    /// Fails with `NotReady` until the provider has loaded.
    fn sdks(&self) -> Result<Vec<Arc<dyn Sdk>>, HostError> {
        self.ensure_loaded()?;
        Ok(self.sdk_model().iter_snapshot())
    }

    /// Look up a discovered SDK by identifier.
    fn find_sdk(&self, id: &str) -> Result<Option<Arc<dyn Sdk>>, HostError> {
        Ok(self.sdks()?.into_iter().find(|sdk| sdk.id() == id))
    }

    /// Record a newly discovered SDK, notifying collection observers.
    fn sdk_added(&self, sdk: Arc<dyn Sdk>) {
        self.sdk_model().push(sdk);
    }

    /// Drop a no-longer-available SDK, notifying collection observers.
    /// Returns whether anything was removed.
    fn sdk_removed(&self, id: &str) -> bool {
        let model = self.sdk_model();
        let index = (0..model.len())
            .find(|&i| model.get(i).map(|sdk| sdk.id() == id).unwrap_or(false));
        match index {
            Some(index) => {
                model.remove(index);
                true
            }
            None => false,
        }
    }
}

/// The host operating system as an SDK. Always installed.
pub struct HostSdk;

impl Sdk for HostSdk {
    fn id(&self) -> String {
        "host".to_string()
    }

    fn name(&self) -> String {
        "Host operating system".to_string()
    }

    fn flavor(&self) -> String {
        "host".to_string()
    }

    fn installed(&self) -> bool {
        true
    }
}

/// Built-in provider exposing the host SDK.
///
/// Registered by every context at construction; its discovery is complete
/// before `load` runs, so loading is a no-op.
pub struct HostSdkProvider {
    contextual: Contextual,
    lifecycle: Lifecycle,
    sdks: Arc<VecModel<Arc<dyn Sdk>>>,
}

impl HostSdkProvider {
    pub fn new(context: &Arc<Context>) -> Self {
        let sdks: Arc<VecModel<Arc<dyn Sdk>>> = Arc::new(VecModel::new());
        sdks.push(Arc::new(HostSdk));
        Self {
            contextual: Contextual::new(context),
            lifecycle: Lifecycle::new(),
            sdks,
        }
    }
}

#[async_trait]
impl Provider for HostSdkProvider {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::SDK_PROVIDER
    }

    fn identity(&self) -> String {
        "host".to_string()
    }

    fn contextual(&self) -> &Contextual {
        &self.contextual
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn display_name(&self) -> String {
        "Host".to_string()
    }
}

impl SdkProvider for HostSdkProvider {
    fn sdk_model(&self) -> &Arc<VecModel<Arc<dyn Sdk>>> {
        &self.sdks
    }
}
