//! Documentation search capability.
//!
//! A [`DocumentationQuery`] describes what to look for; issuing it yields
//! [`DocumentationMatches`] — the query paired with a promise of results
//! that the answering backend binds exactly once. UI-facing consumers wait
//! on or observe the matches without knowing which backend answered.

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::promise::{Outcome, Promise};
use crate::provider::Provider;

/// What to search the documentation index for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationQuery {
    /// Keyword to match, e.g. a symbol or function name.
    pub keyword: String,
    /// Restrict to one documentation set (a book, an SDK's docs).
    pub section: Option<String>,
}

impl DocumentationQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            section: None,
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationMatch {
    pub title: String,
    pub uri: String,
    pub snippet: Option<String>,
}

/// A query paired with the settable promise of its results.
///
/// The promise is bound exactly once, when the search backend responds;
/// a second `bind` fails with [`HostError::AlreadySettled`].
pub struct DocumentationMatches {
    query: DocumentationQuery,
    matches: Promise<Vec<DocumentationMatch>>,
}

impl DocumentationMatches {
    pub fn new(query: DocumentationQuery) -> Self {
        Self {
            query,
            matches: Promise::new(),
        }
    }

    pub fn query(&self) -> &DocumentationQuery {
        &self.query
    }

    /// Bind the results once the backend has answered.
    pub fn bind(&self, matches: Vec<DocumentationMatch>) -> Result<(), HostError> {
        self.matches.resolve(matches)
    }

    /// Bind a backend failure instead of results.
    pub fn bind_error(&self, error: HostError) -> Result<(), HostError> {
        self.matches.reject(error)
    }

    /// The promise of results, for continuation-style consumers.
    pub fn matches(&self) -> Promise<Vec<DocumentationMatch>> {
        self.matches.clone()
    }

    /// Suspend until the backend has answered.
    pub async fn wait(&self) -> Outcome<Vec<DocumentationMatch>> {
        self.matches.wait().await
    }
}

/// Searches one documentation backend.
pub trait DocumentationProvider: Provider {
    /// Issue `query` asynchronously; the returned matches are bound once
    /// the backend responds.
    fn query(&self, query: DocumentationQuery) -> DocumentationMatches;
}
