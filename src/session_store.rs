//! Session store: ties identity, codec and persistence together

use async_trait::async_trait;
use salvo_core::{Request, Response};
use std::collections::HashMap;
use std::sync::Arc;

use crate::codec;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::gateway::PersistenceGateway;
use crate::identity::{CookieTransport, HeaderTransport, IdentityTransport};
use crate::session::{Session, SessionData};
use crate::store::{DocumentStore, StoredDocument};

/// Load and persist named sessions for a request
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Get the session `name` for this request.
    ///
    /// The first call for a name loads the session; later calls within the
    /// same request return the same (shared) session.
    async fn get(&self, req: &mut Request, name: &str) -> Result<Session, SessionError>;

    /// Load the session `name` from the store, or create a new one.
    async fn new(&self, req: &mut Request, name: &str) -> Result<Session, SessionError>;

    /// Persist the session, assigning it an ID if it has none yet.
    async fn save(&self, req: &mut Request, res: &mut Response, session: &Session) -> Result<(), SessionError>;
}

/// Sessions already loaded during the current request, by name
#[derive(Clone, Default)]
struct SessionRegistry(HashMap<String, Session>);

/// Document-store backed session store.
///
/// Each session name is used as the collection name in the backing store,
/// so different apps sharing a backend should use different names.
/// Sessions never expire and are never deleted.
pub struct DocSessionStore<D: DocumentStore, T: IdentityTransport> {
    gateway: PersistenceGateway<D>,
    transport: T,
    config: SessionConfig,
}

impl<D: DocumentStore> DocSessionStore<D, HeaderTransport> {
    /// Store reading session IDs from a request header named after the session
    pub fn with_header(store: D) -> Self {
        DocSessionStore::new(store, HeaderTransport, SessionConfig::default())
    }
}

impl<D: DocumentStore> DocSessionStore<D, CookieTransport> {
    /// Store keeping session IDs in a signed cookie named after the session
    pub fn with_cookie(store: D, config: SessionConfig) -> Self {
        let transport = CookieTransport::from_config(&config);
        DocSessionStore::new(store, transport, config)
    }
}

impl<D: DocumentStore, T: IdentityTransport> DocSessionStore<D, T> {
    /// Create a new session store
    pub fn new(store: D, transport: T, config: SessionConfig) -> Self {
        Self::from_arc(Arc::new(store), transport, config)
    }

    /// Create a new session store sharing an existing backend handle
    pub fn from_arc(store: Arc<D>, transport: T, config: SessionConfig) -> Self {
        Self {
            gateway: PersistenceGateway::new(store),
            transport,
            config,
        }
    }

    /// The backing document store
    pub fn backend(&self) -> &D {
        self.gateway.store()
    }

    fn empty_session(&self, name: &str) -> Session {
        let options = self
            .transport
            .carries_options()
            .then(|| self.config.options.clone());
        Session::new(name, SessionData::new(options), true)
    }

    async fn load(&self, incoming_id: Option<String>, name: &str) -> Result<Session, SessionError> {
        let Some(id) = incoming_id else {
            tracing::debug!(session = name, "No session ID in request, starting new session");
            return Ok(self.empty_session(name));
        };

        let Some(doc) = self.gateway.fetch(name, &id).await? else {
            tracing::debug!(session = name, id = %id, "No stored session, starting new session");
            return Ok(self.empty_session(name));
        };

        let mut data = codec::decode(&doc.encoded_session)?;
        if !self.transport.carries_options() {
            data.options = None;
        } else if data.options.is_none() {
            data.options = Some(self.config.options.clone());
        }
        tracing::debug!(session = name, id = %data.id, "Loaded session");
        Ok(Session::new(name, data, false))
    }
}

#[async_trait]
impl<D: DocumentStore, T: IdentityTransport> SessionStore for DocSessionStore<D, T> {
    async fn get(&self, req: &mut Request, name: &str) -> Result<Session, SessionError> {
        if let Some(session) = req
            .extensions()
            .get::<SessionRegistry>()
            .and_then(|registry| registry.0.get(name))
        {
            return Ok(session.clone());
        }

        let incoming_id = self.transport.resolve_incoming_id(req, name);
        let session = self.load(incoming_id, name).await?;
        let extensions = req.extensions_mut();
        if extensions.get::<SessionRegistry>().is_none() {
            extensions.insert(SessionRegistry::default());
        }
        if let Some(registry) = extensions.get_mut::<SessionRegistry>() {
            registry.0.insert(name.to_string(), session.clone());
        }
        Ok(session)
    }

    async fn new(&self, req: &mut Request, name: &str) -> Result<Session, SessionError> {
        let incoming_id = self.transport.resolve_incoming_id(req, name);
        self.load(incoming_id, name).await
    }

    async fn save(&self, req: &mut Request, res: &mut Response, session: &Session) -> Result<(), SessionError> {
        let name = session.name();

        let mut id = session.id();
        if id.is_empty() {
            id = self.transport.resolve_incoming_id(req, name).unwrap_or_default();
        }
        if id.is_empty() {
            id = self.gateway.allocate_id(name).await?;
        }
        session.set_id(id.clone());

        let data = session.data();
        let encoded = codec::encode(&data, self.transport.carries_options())?;
        self.gateway
            .put(name, &id, &StoredDocument::new(encoded))
            .await
            .map_err(|e| match e {
                SessionError::StoreError(msg) => {
                    SessionError::StoreError(format!("saving session {:?} ({}): {}", name, id, msg))
                }
                other => other,
            })?;
        session.mark_saved();
        tracing::debug!(session = name, id = %id, "Saved session");

        let options = data.options.unwrap_or_else(|| self.config.options.clone());
        self.transport.bind_outgoing_id(res, name, &id, &options);
        Ok(())
    }
}
