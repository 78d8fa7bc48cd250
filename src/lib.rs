//! Atelier: Asynchronous capability host for IDE backends
//!
//! A per-session context hosts dynamically registered capability providers
//! (SDK discovery, devices, version control, documentation search, code
//! actions, LLM tooling) whose long-running operations surface as
//! single-assignment observable promises, composed with combinators and
//! bridged into observable ordered collections for presentation layers.

pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod promise;
pub mod provider;
pub mod registry;
pub mod settings;
