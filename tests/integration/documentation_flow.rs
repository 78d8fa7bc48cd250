//! Documentation search surfaced through the promise-backed list model.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use atelier::context::contextual::Contextual;
use atelier::error::Rejection;
use atelier::model::{ListChange, ListModel, PendingMode, PromiseListModel, Slot};
use atelier::provider::docs::{
    DocumentationMatch, DocumentationMatches, DocumentationProvider, DocumentationQuery,
};
use atelier::provider::{Lifecycle, Provider};
use atelier::registry::CapabilityKind;

use super::test_utils::fresh_context;

/// A documentation backend that answers every query with one canned hit
/// after a short delay, the way an index lookup would.
struct CannedDocsProvider {
    contextual: Contextual,
    lifecycle: Lifecycle,
}

#[async_trait]
impl Provider for CannedDocsProvider {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::DOCUMENTATION_PROVIDER
    }

    fn identity(&self) -> String {
        "canned".to_string()
    }

    fn contextual(&self) -> &Contextual {
        &self.contextual
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    async fn load(&self) -> Result<(), Rejection> {
        Ok(())
    }
}

impl DocumentationProvider for CannedDocsProvider {
    fn query(&self, query: DocumentationQuery) -> DocumentationMatches {
        let matches = DocumentationMatches::new(query);
        let keyword = matches.query().keyword.clone();
        let producer = matches.matches();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = producer.resolve(vec![DocumentationMatch {
                title: keyword.clone(),
                uri: format!("help://canned/{keyword}"),
                snippet: Some(format!("About {keyword}.")),
            }]);
        });
        matches
    }
}

#[tokio::test]
async fn query_binds_once_and_feeds_the_list_model() {
    let context = fresh_context();
    let provider: Arc<dyn DocumentationProvider> = Arc::new(CannedDocsProvider {
        contextual: Contextual::new(&context),
        lifecycle: Lifecycle::new(),
    });
    context.registry().register(provider).unwrap();
    context.start().await.unwrap();

    let providers = context
        .registry()
        .list_of::<dyn DocumentationProvider>(&CapabilityKind::DOCUMENTATION_PROVIDER);
    assert_eq!(providers.len(), 1);

    let matches = providers[0].query(DocumentationQuery::keyword("promise"));

    // Surface the top hit as a pending slot of an observable collection.
    let top_hit = matches
        .matches()
        .then(|outcome| outcome.map(|hits| hits[0].clone()));
    let model = PromiseListModel::with_items(Vec::new(), top_hit, PendingMode::Placeholder);

    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    model.subscribe(Arc::new(move |change| sink.lock().unwrap().push(*change)));

    assert_eq!(model.len(), 1);
    assert!(model.get(0).unwrap().is_pending());

    let hits = matches.wait().await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uri, "help://canned/promise");

    // The consumer-facing slot materialized with exactly one change
    // notification for its index.
    model.await_bound().wait().await.unwrap();
    assert_eq!(
        *changes.lock().unwrap(),
        vec![ListChange::Changed { index: 0 }]
    );
    match model.get(0).unwrap() {
        Slot::Ready(hit) => assert_eq!(hit.title, "promise"),
        Slot::Pending => panic!("slot should have materialized"),
    }
}
