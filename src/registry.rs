//! Capability registry: the per-context catalog of provider instances.
//!
//! Providers are keyed by `(capability kind, identity)`; many providers may
//! serve one kind. Enumeration is snapshot-consistent and never blocks
//! registration. The registry also drives the provider lifecycle: fan-in
//! loading at context startup and reverse-order, best-effort unloading at
//! teardown.

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::context::contextual::Contextual;
use crate::error::{HostError, Rejection};
use crate::promise::{combine, Promise};
use crate::provider::{Lifecycle, Provider};

/// An abstract extension point with one contract and many possible
/// implementations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityKind(Cow<'static, str>);

impl CapabilityKind {
    pub const SDK_PROVIDER: CapabilityKind = CapabilityKind(Cow::Borrowed("sdk-provider"));
    pub const DEVICE: CapabilityKind = CapabilityKind(Cow::Borrowed("device"));
    pub const VCS_REMOTE: CapabilityKind = CapabilityKind(Cow::Borrowed("vcs-remote"));
    pub const CODE_ACTION_PROVIDER: CapabilityKind =
        CapabilityKind(Cow::Borrowed("code-action-provider"));
    pub const LLM_TOOL: CapabilityKind = CapabilityKind(Cow::Borrowed("llm-tool"));
    pub const DOCUMENTATION_PROVIDER: CapabilityKind =
        CapabilityKind(Cow::Borrowed("documentation-provider"));

    /// A kind outside the built-in set; plugins may define their own
    /// extension points.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Adapter that erases a capability-typed handle down to `dyn Provider`
/// for lifecycle bookkeeping, delegating every contract method.
struct RegisteredProvider<C: Provider + ?Sized>(Arc<C>);

#[async_trait]
impl<C: Provider + ?Sized + 'static> Provider for RegisteredProvider<C> {
    fn kind(&self) -> CapabilityKind {
        self.0.kind()
    }

    fn identity(&self) -> String {
        self.0.identity()
    }

    fn contextual(&self) -> &Contextual {
        self.0.contextual()
    }

    fn lifecycle(&self) -> &Lifecycle {
        self.0.lifecycle()
    }

    fn display_name(&self) -> String {
        self.0.display_name()
    }

    async fn load(&self) -> Result<(), Rejection> {
        self.0.load().await
    }

    async fn unload(&self) -> Result<(), Rejection> {
        self.0.unload().await
    }
}

struct Entry {
    sequence: u64,
    identity: String,
    provider: Arc<dyn Provider>,
    /// The capability-typed `Arc` exactly as registered, recovered by
    /// [`ProviderRegistry::list_of`].
    capability: Box<dyn Any + Send + Sync>,
}

/// Per-context catalog of registered providers.
pub struct ProviderRegistry {
    entries: RwLock<HashMap<CapabilityKind, Vec<Entry>>>,
    next_sequence: AtomicU64,
    closed: AtomicBool,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_sequence: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Register a provider under its capability kind.
    ///
    /// `capability` should be the capability-typed handle (e.g.
    /// `Arc<dyn SdkProvider>`) so that [`ProviderRegistry::list_of`] can
    /// recover it. Fails with `DuplicateProvider` when the `(kind,
    /// identity)` pair is already present and `InShutdown` once the owning
    /// context began teardown.
    pub fn register<C>(&self, capability: Arc<C>) -> Result<(), HostError>
    where
        C: Provider + ?Sized + 'static,
    {
        if self.closed.load(Ordering::SeqCst) {
            return Err(HostError::InShutdown);
        }

        let kind = capability.kind();
        let identity = capability.identity();
        let provider: Arc<dyn Provider> = Arc::new(RegisteredProvider(Arc::clone(&capability)));

        let mut entries = self.entries.write();
        let bucket = entries.entry(kind.clone()).or_default();
        if bucket.iter().any(|entry| entry.identity == identity) {
            return Err(HostError::DuplicateProvider { kind, identity });
        }

        debug!(kind = %kind, identity = %identity, "registering provider");
        bucket.push(Entry {
            sequence: self.next_sequence.fetch_add(1, Ordering::SeqCst),
            identity,
            provider,
            capability: Box::new(capability),
        });
        Ok(())
    }

    /// Remove a provider. Safe to call while another caller enumerates; an
    /// in-progress snapshot keeps the removed handle alive until dropped.
    pub fn unregister(
        &self,
        kind: &CapabilityKind,
        identity: &str,
    ) -> Option<Arc<dyn Provider>> {
        let mut entries = self.entries.write();
        let bucket = entries.get_mut(kind)?;
        let index = bucket.iter().position(|entry| entry.identity == identity)?;
        let entry = bucket.remove(index);
        debug!(kind = %kind, identity = %identity, "unregistered provider");
        Some(entry.provider)
    }

    /// Providers registered for `kind`, in registration order.
    ///
    /// The returned vector is a snapshot consistent at call time: later
    /// registrations do not retroactively appear in it.
    pub fn list(&self, kind: &CapabilityKind) -> Vec<Arc<dyn Provider>> {
        self.entries
            .read()
            .get(kind)
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|entry| Arc::clone(&entry.provider))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Capability-typed snapshot for `kind`.
    ///
    /// Recovers the handles exactly as registered; entries registered under
    /// a different capability type are skipped.
    pub fn list_of<C>(&self, kind: &CapabilityKind) -> Vec<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.entries
            .read()
            .get(kind)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter_map(|entry| entry.capability.downcast_ref::<Arc<C>>())
                    .map(Arc::clone)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn providers_in_order(&self) -> Vec<Arc<dyn Provider>> {
        let entries = self.entries.read();
        let mut providers: Vec<(u64, Arc<dyn Provider>)> = entries
            .values()
            .flatten()
            .map(|entry| (entry.sequence, Arc::clone(&entry.provider)))
            .collect();
        providers.sort_by_key(|(sequence, _)| *sequence);
        providers
            .into_iter()
            .map(|(_, provider)| provider)
            .collect()
    }

    /// Load every registered provider, fanning in the `load()` promises.
    ///
    /// Surfaces the first failure (fail-fast, like any `all` fan-in);
    /// providers whose load succeeded end up `Loaded`, the failed one
    /// returns to `Unloaded` and stays non-ready.
    pub async fn load_all(&self) -> Result<(), Rejection> {
        let providers = self.providers_in_order();
        debug!(count = providers.len(), "loading providers");

        let loads: Vec<Promise<()>> = providers.into_iter().map(drive_load).collect();
        combine::all(loads).wait().await.map(|_| ())
    }

    /// Unload every provider in reverse registration order, best-effort.
    ///
    /// A failing unload does not prevent the rest from running; all
    /// failures are collected into `UnloadIncomplete`.
    pub async fn unload_all(&self) -> Result<(), HostError> {
        let mut providers = self.providers_in_order();
        providers.reverse();
        debug!(count = providers.len(), "unloading providers");

        let mut failures = Vec::new();
        for provider in providers {
            if provider.lifecycle().begin_unload().is_err() {
                // Never finished loading; nothing to tear down.
                continue;
            }
            match provider.unload().await {
                Ok(()) => provider.lifecycle().finish_unload(),
                Err(rejection) => {
                    warn!(
                        identity = %provider.identity(),
                        error = %rejection,
                        "provider failed to unload"
                    );
                    provider.lifecycle().fail_unload(Arc::clone(&rejection));
                    failures.push(rejection);
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(HostError::UnloadIncomplete { failures })
        }
    }

    /// Refuse further registrations; called once the owning context begins
    /// teardown.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

fn drive_load(provider: Arc<dyn Provider>) -> Promise<()> {
    if provider.lifecycle().begin_load().is_err() {
        // Already loading or loaded from an earlier call; nothing to drive.
        return Promise::resolved(());
    }

    let task = {
        let provider = Arc::clone(&provider);
        Promise::spawn(async move { provider.load().await })
    };

    let tracker = provider;
    task.on_settled(move |outcome| match outcome {
        Ok(()) => tracker.lifecycle().finish_load(),
        Err(rejection) => {
            warn!(
                identity = %tracker.identity(),
                error = %rejection,
                "provider failed to load"
            );
            tracker.lifecycle().fail_load(Arc::clone(rejection));
        }
    });
    task
}
