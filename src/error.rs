//! Session error types

use std::fmt;

/// Errors that can occur during session operations
#[derive(Debug)]
pub enum SessionError {
    /// A session value key was not a string
    KeyTypeInvalid(String),
    /// The encoded session is larger than the store accepts
    MaxLengthExceeded {
        /// Encoded length in bytes
        length: usize,
        /// Maximum accepted length in bytes
        max: usize,
    },
    /// Error while encoding a session
    Marshal(String),
    /// Error while decoding a stored session
    Unmarshal(String),
    /// Error from the backing document store
    StoreError(String),
    /// The backing store has no document for the requested ID
    NotFound,
    /// Redis error (when redis-store feature is enabled)
    #[cfg(feature = "redis-store")]
    RedisError(redis::RedisError),
}

impl SessionError {
    /// Whether this error is the backing store's "missing document" signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::NotFound)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::KeyTypeInvalid(key) => {
                write!(f, "only string keys supported: {}", key)
            }
            SessionError::MaxLengthExceeded { length, max } => {
                write!(f, "max length of session exceeded: {} > {}", length, max)
            }
            SessionError::Marshal(msg) => write!(f, "Session encoding error: {}", msg),
            SessionError::Unmarshal(msg) => write!(f, "Session decoding error: {}", msg),
            SessionError::StoreError(msg) => write!(f, "Document store error: {}", msg),
            SessionError::NotFound => write!(f, "Document not found"),
            #[cfg(feature = "redis-store")]
            SessionError::RedisError(e) => write!(f, "Redis error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "redis-store")]
            SessionError::RedisError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "redis-store")]
impl From<redis::RedisError> for SessionError {
    fn from(err: redis::RedisError) -> Self {
        SessionError::RedisError(err)
    }
}

/// Bare JSON errors come from reading stored documents, so they are decode failures.
impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Unmarshal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_length_message() {
        let err = SessionError::MaxLengthExceeded {
            length: 10,
            max: 5,
        };
        assert!(err.to_string().contains("max length"));
        assert!(err.to_string().contains("10 > 5"));
    }

    #[test]
    fn test_not_found_detection() {
        assert!(SessionError::NotFound.is_not_found());
        assert!(!SessionError::StoreError("boom".into()).is_not_found());
    }
}
