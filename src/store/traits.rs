//! Document store trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Document wrapping an encoded session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    #[serde(rename = "EncodedSession")]
    pub encoded_session: String,
}

impl StoredDocument {
    pub fn new<S: Into<String>>(encoded_session: S) -> Self {
        Self {
            encoded_session: encoded_session.into(),
        }
    }
}

/// Trait for backing document stores
///
/// Documents are addressed by a collection name and a document ID.
/// Session stores use the session name as the collection, so different
/// applications sharing a backend should use different session names.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Get a document
    ///
    /// Returns `SessionError::NotFound` if the document doesn't exist
    async fn get(&self, collection: &str, id: &str) -> Result<StoredDocument, SessionError>;

    /// Create or overwrite a document
    async fn set(&self, collection: &str, id: &str, doc: &StoredDocument) -> Result<(), SessionError>;

    /// Delete a document
    ///
    /// Deleting a missing document is not an error
    async fn delete(&self, collection: &str, id: &str) -> Result<(), SessionError>;

    /// Allocate a document ID that is unused in the collection
    async fn new_id(&self, collection: &str) -> Result<String, SessionError>;
}
