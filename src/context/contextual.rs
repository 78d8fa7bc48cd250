//! Binding of provider/service instances to their owning context.

use std::sync::{Arc, Weak};

use crate::context::Context;
use crate::error::HostError;

/// Binds an instance to exactly one [`Context`] for its entire lifetime.
///
/// Providers and services embed a `Contextual` at construction; there is
/// no re-parenting API. The binding holds a weak reference so provider
/// instances never keep a torn-down context alive; accessing the context
/// after teardown fails with [`HostError::InvalidContext`].
pub struct Contextual {
    context: Weak<Context>,
}

impl Contextual {
    pub fn new(context: &Arc<Context>) -> Self {
        Self {
            context: Arc::downgrade(context),
        }
    }

    /// The owning context.
    pub fn context(&self) -> Result<Arc<Context>, HostError> {
        self.context.upgrade().ok_or(HostError::InvalidContext)
    }
}
