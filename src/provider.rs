//! Provider base contract and lifecycle state machine.
//!
//! Every capability implementation registered with a context goes through
//! the same lifecycle: `Unloaded -> Loading -> Loaded -> Unloading ->
//! Unloaded`. The registry drives the transitions around the provider's
//! async `load`/`unload` hooks; capability operations are only legal while
//! `Loaded`.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::context::contextual::Contextual;
use crate::error::{HostError, Rejection};
use crate::promise::Promise;
use crate::registry::CapabilityKind;

pub mod code_action;
pub mod device;
pub mod docs;
pub mod llm;
pub mod sdk;
pub mod vcs;

/// Lifecycle state of a provider instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    Unloaded,
    Loading,
    Loaded,
    Unloading,
}

/// Lifecycle bookkeeping embedded by every provider.
///
/// `Loading` and `Unloading` are the only states in which the
/// corresponding promise is pending. The readiness promises are
/// single-assignment and reflect the first load/unload attempt.
pub struct Lifecycle {
    state: Mutex<ProviderState>,
    when_ready: Promise<()>,
    when_unloaded: Promise<()>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ProviderState::Unloaded),
            when_ready: Promise::new(),
            when_unloaded: Promise::new(),
        }
    }

    pub fn state(&self) -> ProviderState {
        *self.state.lock()
    }

    /// Promise that settles once the provider has finished (or failed)
    /// loading.
    pub fn when_ready(&self) -> Promise<()> {
        self.when_ready.clone()
    }

    /// Promise that settles once the provider has finished (or failed)
    /// unloading.
    pub fn when_unloaded(&self) -> Promise<()> {
        self.when_unloaded.clone()
    }

    fn transition(
        &self,
        from: ProviderState,
        to: ProviderState,
    ) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if *state != from {
            return Err(HostError::InvalidTransition { from: *state, to });
        }
        *state = to;
        Ok(())
    }

    pub(crate) fn begin_load(&self) -> Result<(), HostError> {
        self.transition(ProviderState::Unloaded, ProviderState::Loading)
    }

    pub(crate) fn finish_load(&self) {
        let _ = self.transition(ProviderState::Loading, ProviderState::Loaded);
        let _ = self.when_ready.resolve(());
    }

    /// A failed load leaves the provider `Unloaded`; capability operations
    /// keep failing with `NotReady` rather than bringing down the session.
    pub(crate) fn fail_load(&self, rejection: Rejection) {
        let _ = self.transition(ProviderState::Loading, ProviderState::Unloaded);
        let _ = self.when_ready.reject_with(rejection);
    }

    pub(crate) fn begin_unload(&self) -> Result<(), HostError> {
        self.transition(ProviderState::Loaded, ProviderState::Unloading)
    }

    pub(crate) fn finish_unload(&self) {
        let _ = self.transition(ProviderState::Unloading, ProviderState::Unloaded);
        let _ = self.when_unloaded.resolve(());
    }

    pub(crate) fn fail_unload(&self, rejection: Rejection) {
        let _ = self.transition(ProviderState::Unloading, ProviderState::Unloaded);
        let _ = self.when_unloaded.reject_with(rejection);
    }
}

/// Base contract implemented by every capability provider.
///
/// Concrete providers embed a [`Contextual`] (binding them to exactly one
/// context for their lifetime) and a [`Lifecycle`], and override the async
/// hooks as needed. The hooks default to no-ops for providers with nothing
/// asynchronous to set up.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Capability kind this provider implements.
    fn kind(&self) -> CapabilityKind;

    /// Identity key, unique per kind within a context.
    fn identity(&self) -> String;

    fn contextual(&self) -> &Contextual;

    fn lifecycle(&self) -> &Lifecycle;

    /// Human-readable name, e.g. for diagnostics output.
    fn display_name(&self) -> String {
        self.identity()
    }

    /// Asynchronous setup: network handshakes, subprocess spawns, index
    /// warm-up. Driven by the registry during `load_all`.
    async fn load(&self) -> Result<(), Rejection> {
        Ok(())
    }

    /// Asynchronous teardown, driven in reverse registration order during
    /// `unload_all`.
    async fn unload(&self) -> Result<(), Rejection> {
        Ok(())
    }

    /// Guard for capability operations: only a `Loaded` provider may serve
    /// them.
    fn ensure_loaded(&self) -> Result<(), HostError> {
        let state = self.lifecycle().state();
        if state == ProviderState::Loaded {
            Ok(())
        } else {
            Err(HostError::NotReady {
                kind: self.kind(),
                identity: self.identity(),
                state,
            })
        }
    }
}
