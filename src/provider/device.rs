//! Target device capability.
//!
//! Devices are where builds are deployed or run. Exactly one host device
//! exists per context, registered at construction; providers for remote
//! devices (network targets, phones, boards) are extension points.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::contextual::Contextual;
use crate::context::Context;
use crate::provider::{Lifecycle, Provider};
use crate::registry::CapabilityKind;

pub trait Device: Provider {
    /// Stable device identifier, e.g. `host`.
    fn id(&self) -> String;

    /// Instruction set / platform triple if known.
    fn triple(&self) -> Option<String> {
        None
    }
}

/// The machine the host process runs on. Requires no setup.
pub struct HostDevice {
    contextual: Contextual,
    lifecycle: Lifecycle,
}

impl HostDevice {
    pub const ID: &'static str = "host";

    pub fn new(context: &Arc<Context>) -> Self {
        Self {
            contextual: Contextual::new(context),
            lifecycle: Lifecycle::new(),
        }
    }
}

#[async_trait]
impl Provider for HostDevice {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::DEVICE
    }

    fn identity(&self) -> String {
        Self::ID.to_string()
    }

    fn contextual(&self) -> &Contextual {
        &self.contextual
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn display_name(&self) -> String {
        "My Computer".to_string()
    }
}

impl Device for HostDevice {
    fn id(&self) -> String {
        Self::ID.to_string()
    }
}
