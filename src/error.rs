//! Error types for the capability host.

use std::sync::Arc;

use thiserror::Error;

use crate::provider::ProviderState;
use crate::registry::CapabilityKind;

/// Shared rejection payload observed by every consumer of a settled promise.
///
/// Rejections are reference-counted so that any number of continuations and
/// waiters see the same terminal error without requiring `HostError: Clone`.
pub type Rejection = Arc<HostError>;

/// Errors raised by the capability host core.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("promise already settled")]
    AlreadySettled,

    #[error("operation cancelled")]
    Cancelled,

    #[error("timed out waiting for promise")]
    TimedOut,

    #[error("object is not bound to a live context")]
    InvalidContext,

    #[error("provider {identity} ({kind}) is not ready (state: {state:?})")]
    NotReady {
        kind: CapabilityKind,
        identity: String,
        state: ProviderState,
    },

    #[error("provider {identity} already registered for {kind}")]
    DuplicateProvider {
        kind: CapabilityKind,
        identity: String,
    },

    #[error("invalid provider state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: ProviderState,
        to: ProviderState,
    },

    #[error("context is shutting down")]
    InShutdown,

    #[error("{} provider(s) failed to unload", .failures.len())]
    UnloadIncomplete { failures: Vec<Rejection> },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl HostError {
    /// Wrap this error for use as a promise rejection.
    pub fn into_rejection(self) -> Rejection {
        Arc::new(self)
    }
}

impl From<config::ConfigError> for HostError {
    fn from(err: config::ConfigError) -> Self {
        HostError::Config(err.to_string())
    }
}
