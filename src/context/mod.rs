//! Session context: the owner of everything a workspace session holds.
//!
//! One `Context` exists per IDE workspace/session. It owns the capability
//! registry, the session settings, and the directories providers need, and
//! it drives provider lifecycle at startup and teardown. Every provider
//! instance is bound to exactly one context for its entire lifetime.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::error::{HostError, Rejection};
use crate::provider::device::{Device, HostDevice};
use crate::provider::sdk::{HostSdkProvider, SdkProvider};
use crate::registry::{CapabilityKind, ProviderRegistry};
use crate::settings::Settings;

pub mod contextual;

pub struct Context {
    project_dir: PathBuf,
    state_dir: PathBuf,
    settings: Settings,
    registry: ProviderRegistry,
    shutting_down: AtomicBool,
}

impl Context {
    /// Create a context for the project at `project_dir`.
    ///
    /// The built-in host device and host SDK provider are registered
    /// before the context is handed out, so both exist independent of any
    /// plugin.
    pub fn new(project_dir: PathBuf, settings: Settings) -> Result<Arc<Self>, HostError> {
        let state_dir = settings
            .state_dir
            .clone()
            .unwrap_or_else(|| project_dir.join(".atelier"));

        let context = Arc::new(Self {
            project_dir,
            state_dir,
            settings,
            registry: ProviderRegistry::new(),
            shutting_down: AtomicBool::new(false),
        });

        let host_device: Arc<dyn Device> = Arc::new(HostDevice::new(&context));
        context.registry.register(host_device)?;

        let host_sdks: Arc<dyn SdkProvider> = Arc::new(HostSdkProvider::new(&context));
        context.registry.register(host_sdks)?;

        Ok(context)
    }

    /// Load settings from disk and create a context in one step.
    pub fn discover(project_dir: PathBuf) -> Result<Arc<Self>, HostError> {
        let settings = Settings::load(&project_dir)?;
        Self::new(project_dir, settings)
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Directory for session-scoped state (caches, indexes).
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// The always-present local device.
    pub fn host_device(&self) -> Option<Arc<dyn Device>> {
        self.registry
            .list_of::<dyn Device>(&CapabilityKind::DEVICE)
            .into_iter()
            .find(|device| device.id() == HostDevice::ID)
    }

    /// Load all registered providers (fan-in across their `load()`
    /// promises).
    pub async fn start(&self) -> Result<(), Rejection> {
        info!(project = %self.project_dir.display(), "starting context");
        self.registry.load_all().await
    }

    /// Tear the session down: refuse new registrations, then unload every
    /// provider in reverse registration order.
    ///
    /// Fails with `InShutdown` if teardown has already begun.
    pub async fn shutdown(&self) -> Result<(), HostError> {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            return Err(HostError::InShutdown);
        }
        info!(project = %self.project_dir.display(), "shutting down context");
        self.registry.close();
        self.registry.unload_all().await
    }
}
