//! Session data structure

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::SessionOptions;
use crate::error::SessionError;

/// Key of a session value.
///
/// Only [`SessionKey::Str`] keys can be persisted; other key kinds are kept in
/// memory but make encoding fail with [`SessionError::KeyTypeInvalid`].
///
/// [`SessionError::KeyTypeInvalid`]: crate::SessionError::KeyTypeInvalid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl SessionKey {
    /// The key as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SessionKey::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKey::Str(s) => write!(f, "{:?}", s),
            SessionKey::Int(i) => write!(f, "{}", i),
            SessionKey::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for SessionKey {
    fn from(s: &str) -> Self {
        SessionKey::Str(s.to_string())
    }
}

impl From<String> for SessionKey {
    fn from(s: String) -> Self {
        SessionKey::Str(s)
    }
}

impl From<i64> for SessionKey {
    fn from(i: i64) -> Self {
        SessionKey::Int(i)
    }
}

impl From<i32> for SessionKey {
    fn from(i: i32) -> Self {
        SessionKey::Int(i as i64)
    }
}

impl From<bool> for SessionKey {
    fn from(b: bool) -> Self {
        SessionKey::Bool(b)
    }
}

/// Plain session state: what gets encoded into the backing store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    /// Session ID; empty until the session is first saved
    pub id: String,

    /// Session values
    pub values: HashMap<SessionKey, Value>,

    /// Cookie policy, for sessions whose identity travels in a cookie
    pub options: Option<SessionOptions>,
}

impl SessionData {
    /// Create empty session data with the given cookie policy
    pub fn new(options: Option<SessionOptions>) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Get a value from session data
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.values
            .get(&SessionKey::from(key))
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in session data
    ///
    /// Fails with `SessionError::Marshal` if the value can't be represented
    /// as JSON; the existing value under `key` is left untouched.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), SessionError> {
        let v = serde_json::to_value(value)
            .map_err(|e| SessionError::Marshal(format!("value for {:?}: {}", key, e)))?;
        self.values.insert(SessionKey::from(key), v);
        Ok(())
    }
}

/// Session handle
///
/// Clones share the same underlying state, so a session handed out by
/// [`SessionStore::get`](crate::SessionStore::get) or stored in the `Depot`
/// can be mutated through any clone and saved through another.
pub struct Session {
    /// Session (and collection) name
    name: String,

    /// Session data
    data: Arc<RwLock<SessionData>>,

    /// Whether the session has been modified since it was loaded or saved
    modified: Arc<AtomicBool>,

    /// Whether the session had no stored document when loaded
    is_new: bool,
}

impl Session {
    /// Create a new session with the given name and data
    pub fn new<S: Into<String>>(name: S, data: SessionData, is_new: bool) -> Self {
        Self {
            name: name.into(),
            data: Arc::new(RwLock::new(data)),
            modified: Arc::new(AtomicBool::new(false)),
            is_new,
        }
    }

    /// Session name, also the collection name in the backing store
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session ID; empty until assigned by the first save
    pub fn id(&self) -> String {
        self.data.read().id.clone()
    }

    pub(crate) fn set_id(&self, id: String) {
        self.data.write().id = id;
    }

    /// Check if this is a new session
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Check if the session has been modified
    pub fn is_modified(&self) -> bool {
        self.modified.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_saved(&self) {
        self.modified.store(false, Ordering::SeqCst);
    }

    /// Get a value from the session
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data.read().get(key)
    }

    /// Set a value in the session
    pub fn set<T: Serialize>(&self, key: &str, value: T) -> Result<(), SessionError> {
        self.data.write().set(key, value)?;
        self.modified.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Set a raw value under any key kind
    pub fn set_key<K: Into<SessionKey>>(&self, key: K, value: Value) {
        self.data.write().values.insert(key.into(), value);
        self.modified.store(true, Ordering::SeqCst);
    }

    /// Remove a value from the session
    pub fn remove(&self, key: &str) -> Option<Value> {
        let result = self.data.write().values.remove(&SessionKey::from(key));
        if result.is_some() {
            self.modified.store(true, Ordering::SeqCst);
        }
        result
    }

    /// Check if a key exists in the session
    pub fn contains(&self, key: &str) -> bool {
        self.data.read().values.contains_key(&SessionKey::from(key))
    }

    /// Clear all session values
    pub fn clear(&self) {
        self.data.write().values.clear();
        self.modified.store(true, Ordering::SeqCst);
    }

    /// Cookie policy of this session
    pub fn options(&self) -> Option<SessionOptions> {
        self.data.read().options.clone()
    }

    /// Replace the cookie policy of this session
    pub fn set_options(&self, options: Option<SessionOptions>) {
        self.data.write().options = options;
        self.modified.store(true, Ordering::SeqCst);
    }

    /// Get a copy of the session data
    pub fn data(&self) -> SessionData {
        self.data.read().clone()
    }

    /// Check if the session is empty (no values)
    pub fn is_empty(&self) -> bool {
        self.data.read().values.is_empty()
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            data: Arc::clone(&self.data),
            modified: Arc::clone(&self.modified),
            is_new: self.is_new,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("data", &*self.data.read())
            .field("modified", &self.modified.load(Ordering::SeqCst))
            .field("is_new", &self.is_new)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clones_share_state() {
        let session = Session::new("app", SessionData::default(), true);
        let other = session.clone();

        other.set("views", 3).unwrap();
        assert_eq!(session.get::<i32>("views"), Some(3));
        assert!(session.is_modified());

        session.set_id("abc".to_string());
        assert_eq!(other.id(), "abc");
    }

    #[test]
    fn test_remove_only_marks_modified_when_present() {
        let session = Session::new("app", SessionData::default(), true);
        assert!(session.remove("missing").is_none());
        assert!(!session.is_modified());

        session.set("user", "alice").unwrap();
        session.mark_saved();
        assert_eq!(session.remove("user"), Some(json!("alice")));
        assert!(session.is_modified());
        assert!(session.is_empty());
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot serialize"))
        }
    }

    #[test]
    fn test_set_reports_unserializable_value() {
        let session = Session::new("app", SessionData::default(), true);
        session.set("ok", 1).unwrap();
        session.mark_saved();

        let err = session.set("bad", Unserializable).unwrap_err();
        assert!(matches!(err, SessionError::Marshal(ref msg) if msg.contains("bad")));
        assert!(!session.contains("bad"));
        assert!(!session.is_modified());
        assert_eq!(session.get::<i32>("ok"), Some(1));

        let mut data = SessionData::default();
        data.set("ok", "kept").unwrap();
        assert!(data.set("ok", Unserializable).is_err());
        assert_eq!(data.get::<String>("ok"), Some("kept".to_string()));
    }

    #[test]
    fn test_non_string_keys_are_kept_in_memory() {
        let session = Session::new("app", SessionData::default(), true);
        session.set_key(7, json!("seven"));
        session.set_key("seven", json!(7));

        let data = session.data();
        assert_eq!(data.values.get(&SessionKey::Int(7)), Some(&json!("seven")));
        assert_eq!(data.get::<i64>("seven"), Some(7));
        assert_eq!(SessionKey::Int(7).as_str(), None);
    }
}
