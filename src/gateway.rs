//! Persistence gateway between sessions and the backing document store

use std::sync::Arc;

use crate::error::SessionError;
use crate::store::{DocumentStore, StoredDocument};

/// Reads and writes session documents.
///
/// The backing store's `NotFound` becomes `Ok(None)` here; every other
/// failure is passed through untouched. There is no delete: sessions are
/// never removed by the session lifecycle.
pub struct PersistenceGateway<D: DocumentStore> {
    store: Arc<D>,
}

impl<D: DocumentStore> PersistenceGateway<D> {
    pub fn new(store: Arc<D>) -> Self {
        Self { store }
    }

    /// The backing store
    pub fn store(&self) -> &D {
        &self.store
    }

    /// Fetch the document for `id`, or `None` if there is none yet
    pub async fn fetch(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, SessionError> {
        match self.store.get(collection, id).await {
            Ok(doc) => Ok(Some(doc)),
            Err(SessionError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write the document for `id`, replacing any existing one
    pub async fn put(&self, collection: &str, id: &str, doc: &StoredDocument) -> Result<(), SessionError> {
        self.store.set(collection, id, doc).await
    }

    /// Allocate an unused document ID in the collection
    pub async fn allocate_id(&self, collection: &str) -> Result<String, SessionError> {
        self.store.new_id(collection).await
    }
}

impl<D: DocumentStore> Clone for PersistenceGateway<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn get(&self, _: &str, _: &str) -> Result<StoredDocument, SessionError> {
            Err(SessionError::StoreError("unavailable".into()))
        }
        async fn set(&self, _: &str, _: &str, _: &StoredDocument) -> Result<(), SessionError> {
            Err(SessionError::StoreError("unavailable".into()))
        }
        async fn delete(&self, _: &str, _: &str) -> Result<(), SessionError> {
            Ok(())
        }
        async fn new_id(&self, _: &str) -> Result<String, SessionError> {
            Err(SessionError::StoreError("unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let gateway = PersistenceGateway::new(Arc::new(MemoryStore::new()));
        assert_eq!(gateway.fetch("app", "nope").await.unwrap(), None);

        let doc = StoredDocument::new("{}");
        gateway.put("app", "yes", &doc).await.unwrap();
        assert_eq!(gateway.fetch("app", "yes").await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn test_backend_failures_propagate() {
        let gateway = PersistenceGateway::new(Arc::new(BrokenStore));
        assert!(matches!(
            gateway.fetch("app", "id").await,
            Err(SessionError::StoreError(_))
        ));
        assert!(gateway.put("app", "id", &StoredDocument::new("{}")).await.is_err());
        assert!(gateway.allocate_id("app").await.is_err());
    }
}
