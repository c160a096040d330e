//! In-memory document store
//!
//! This is primarily for development and testing.
//! For production, use RedisStore or another persistent store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{DocumentStore, StoredDocument};
use crate::error::SessionError;

type Collections = HashMap<String, HashMap<String, StoredDocument>>;

/// In-memory document store
///
/// Warning: This store is not suitable for production use because:
/// - Documents are lost on server restart
/// - Documents are not shared across multiple server instances
/// - Memory usage grows with number of sessions, nothing is ever evicted
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    /// Create a new memory store
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, HashMap::len)
    }

    /// Check if a collection has no documents
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Remove every document in every collection
    pub fn clear(&self) {
        self.collections.write().clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            collections: Arc::clone(&self.collections),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<StoredDocument, SessionError> {
        self.collections
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
            .ok_or(SessionError::NotFound)
    }

    async fn set(&self, collection: &str, id: &str, doc: &StoredDocument) -> Result<(), SessionError> {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc.clone());
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), SessionError> {
        if let Some(docs) = self.collections.write().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn new_id(&self, collection: &str) -> Result<String, SessionError> {
        let collections = self.collections.read();
        let docs = collections.get(collection);
        loop {
            let id = Uuid::new_v4().simple().to_string();
            if !docs.is_some_and(|d| d.contains_key(&id)) {
                return Ok(id);
            }
        }
    }
}
