//! # salvo-docstore-session
//!
//! Document-store backed session persistence for the Salvo web framework.
//!
//! Each session is stored as one document in a backing document store: the
//! session name is the collection, the session ID is the document ID, and the
//! document holds the session encoded as JSON. The session ID travels either
//! in a request header named after the session, or in a signed cookie.
//!
//! ## Features
//!
//! - **Pluggable document stores**: Redis, Memory, or anything implementing [`DocumentStore`]
//! - **Header or cookie identity**: chosen when the store is built, see [`IdentityTransport`]
//! - **Bounded encoding**: encoded sessions are limited to [`MAX_LENGTH`] bytes
//! - **No expiry**: sessions are never expired, evicted or deleted
//!
//! Only string keys can be persisted.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use salvo::prelude::*;
//! use salvo_docstore_session::{DocSessionStore, MemoryStore, SessionConfig, SessionHandler};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocSessionStore::with_cookie(MemoryStore::new(), SessionConfig::new("your-secret-key"));
//!     let session_handler = SessionHandler::new(store, "my-app-sessions");
//!
//!     let router = Router::new()
//!         .hoop(session_handler)
//!         .get(index);
//!
//!     Server::new(TcpListener::new("127.0.0.1:5800").bind().await)
//!         .serve(router)
//!         .await;
//! }
//!
//! #[handler]
//! async fn index(depot: &mut Depot) -> &'static str {
//!     let session = depot.session_mut().unwrap();
//!     let views: i32 = session.get("views").unwrap_or(0);
//!     session.set("views", views + 1).unwrap();
//!     "Hello, World!"
//! }
//! ```

pub mod codec;
pub mod config;
pub mod cookie_signature;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod identity;
pub mod session;
pub mod session_store;
pub mod store;

pub use codec::MAX_LENGTH;
pub use config::{SameSite, SessionConfig, SessionOptions};
pub use error::SessionError;
pub use handler::SessionHandler;
pub use identity::{CookieTransport, HeaderTransport, IdentityTransport};
pub use session::{Session, SessionData, SessionKey};
pub use session_store::{DocSessionStore, SessionStore};
pub use store::{DocumentStore, MemoryStore, StoredDocument};

#[cfg(feature = "redis-store")]
pub use store::RedisStore;

/// Extension trait for Depot to easily access session
pub mod depot_ext;
pub use depot_ext::SessionDepotExt;
