//! Document store access.
//!
//! [`DocumentStore`] is the seam the entity services are written against;
//! [`ReqwestDocumentStore`] talks to Firestore over its REST API.

use crate::config::StoreConfig;
use crate::FitlogError;
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};

pub mod http_client;
pub mod query;
pub mod value;

pub use http_client::ReqwestDocumentStore;
pub use query::{Direction, FieldFilter, FilterOp, Order, Query};
pub use value::{Fields, Value};

/// A document as read from the store.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Fields,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole document body.
    Overwrite,
    /// Replace only the supplied top-level fields; other stored fields stay.
    Merge,
}

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// `Ok(None)` when the document does not exist.
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, FitlogError>;

    /// Create or replace a document. Never fails because the document exists
    /// or does not exist.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: WriteMode,
    ) -> Result<(), FitlogError>;

    /// Deleting a missing document succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), FitlogError>;

    async fn run_query(&self, query: &Query) -> Result<Vec<StoredDocument>, FitlogError>;
}

static SHARED: OnceLock<Arc<ReqwestDocumentStore>> = OnceLock::new();

/// The process-wide store connection, built from `config` on first use.
///
/// Later calls return the existing connection and ignore their `config`.
pub fn shared(config: &StoreConfig) -> Result<Arc<ReqwestDocumentStore>, FitlogError> {
    if let Some(store) = SHARED.get() {
        return Ok(store.clone());
    }
    let store = Arc::new(ReqwestDocumentStore::from_config(config)?);
    let shared = SHARED.get_or_init(|| store);
    tracing::debug!(project = %shared.project_id(), "document store initialized");
    Ok(shared.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn shared_store_is_initialized_once() {
        let first_cfg = StoreConfig {
            api_key: SecretString::new("k1".into()),
            project_id: "first".into(),
            database: "(default)".into(),
            base_url: "http://localhost:1".into(),
        };
        let second_cfg = StoreConfig {
            project_id: "second".into(),
            ..first_cfg.clone()
        };
        let a = shared(&first_cfg).expect("first");
        let b = shared(&second_cfg).expect("second");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.project_id(), "first");
    }
}
