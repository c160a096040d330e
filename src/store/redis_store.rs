//! Redis document store
//!
//! Storage format:
//! - Key: `prefix + collection + ":" + id` (default prefix: "docs:")
//! - Value: JSON serialized `StoredDocument`
//! - No TTL: documents live until deleted

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::sync::Arc;
use uuid::Uuid;

use super::{DocumentStore, StoredDocument};
use crate::error::SessionError;

/// Redis document store
///
/// # Example
///
/// ```rust,ignore
/// use salvo_docstore_session::RedisStore;
///
/// let client = redis::Client::open("redis://127.0.0.1/")?;
/// let store = RedisStore::new(client).await?;
/// ```
pub struct RedisStore {
    conn: Arc<ConnectionManager>,
    prefix: String,
}

impl RedisStore {
    /// Create a new Redis store with the default "docs:" prefix
    pub async fn new(client: redis::Client) -> Result<Self, SessionError> {
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::from_connection_manager(conn))
    }

    /// Create a new Redis store from a connection string
    pub async fn from_url(url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(url)
            .map_err(|e| SessionError::StoreError(format!("Failed to create Redis client: {}", e)))?;
        Self::new(client).await
    }

    /// Create a new Redis store from an existing connection manager
    pub fn from_connection_manager(conn: ConnectionManager) -> Self {
        Self {
            conn: Arc::new(conn),
            prefix: "docs:".to_string(),
        }
    }

    /// Build with custom prefix
    pub fn with_custom_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Make a storage key from collection and document ID
    fn make_key(&self, collection: &str, id: &str) -> String {
        format!("{}{}:{}", self.prefix, collection, id)
    }
}

impl Clone for RedisStore {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            prefix: self.prefix.clone(),
        }
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn get(&self, collection: &str, id: &str) -> Result<StoredDocument, SessionError> {
        let key = self.make_key(collection, id);
        let mut conn = (*self.conn).clone();

        let data: Option<String> = conn.get(&key).await?;
        match data {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(SessionError::NotFound),
        }
    }

    async fn set(&self, collection: &str, id: &str, doc: &StoredDocument) -> Result<(), SessionError> {
        let key = self.make_key(collection, id);
        let mut conn = (*self.conn).clone();

        let json = serde_json::to_string(doc).map_err(|e| SessionError::Marshal(e.to_string()))?;
        conn.set::<_, _, ()>(&key, &json).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), SessionError> {
        let key = self.make_key(collection, id);
        let mut conn = (*self.conn).clone();

        conn.del::<_, ()>(&key).await?;
        Ok(())
    }

    async fn new_id(&self, collection: &str) -> Result<String, SessionError> {
        let mut conn = (*self.conn).clone();
        loop {
            let id = Uuid::new_v4().simple().to_string();
            let taken: bool = conn.exists(self.make_key(collection, &id)).await?;
            if !taken {
                return Ok(id);
            }
        }
    }
}
