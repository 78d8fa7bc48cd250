//! Code action capability.
//!
//! A pure extension point: the host ships no default actions. Concrete
//! providers (language servers, linters, refactoring engines) propose
//! actions for a document position.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::promise::Promise;
use crate::provider::Provider;

/// Position in a document for which actions are requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLocation {
    pub path: PathBuf,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

/// One proposed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAction {
    pub title: String,
    /// Action category, e.g. `quickfix` or `refactor`, if the backend
    /// classifies it.
    pub kind: Option<String>,
    /// Whether the backend marks this action as the preferred fix.
    #[serde(default)]
    pub preferred: bool,
}

pub trait CodeActionProvider: Provider {
    /// Propose actions for `location`. Providers with nothing to offer
    /// resolve with an empty list.
    fn actions(&self, location: &DocumentLocation) -> Promise<Vec<CodeAction>>;
}
