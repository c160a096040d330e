//! Session middleware handler for Salvo

use async_trait::async_trait;
use salvo_core::http::StatusError;
use salvo_core::{Depot, FlowCtrl, Handler, Request, Response};
use std::sync::Arc;

use crate::session::Session;
use crate::session_store::SessionStore;

pub(crate) const SESSION_KEY: &str = "salvo.docstore.session";

/// Session middleware for Salvo
///
/// Loads the named session before the rest of the chain runs, exposes it
/// through [`SessionDepotExt`](crate::SessionDepotExt), and saves it
/// afterwards if it was modified.
pub struct SessionHandler<S: SessionStore> {
    store: Arc<S>,
    name: String,
}

impl<S: SessionStore> SessionHandler<S> {
    /// Create a new session handler for the session `name`
    pub fn new<N: Into<String>>(store: S, name: N) -> Self {
        Self::from_arc(Arc::new(store), name)
    }

    /// Create a new session handler sharing an existing store
    pub fn from_arc<N: Into<String>>(store: Arc<S>, name: N) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }
}

impl<S: SessionStore> Clone for SessionHandler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name.clone(),
        }
    }
}

#[async_trait]
impl<S: SessionStore> Handler for SessionHandler<S> {
    async fn handle(&self, req: &mut Request, depot: &mut Depot, res: &mut Response, ctrl: &mut FlowCtrl) {
        let session = match self.store.get(req, &self.name).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(session = %self.name, "Failed to load session: {}", e);
                res.render(StatusError::internal_server_error());
                ctrl.skip_rest();
                return;
            }
        };

        depot.insert(SESSION_KEY, session.clone());

        ctrl.call_next(req, depot, res).await;

        if session.is_modified() {
            if let Err(e) = self.store.save(req, res, &session).await {
                tracing::error!(session = %self.name, "Failed to save session: {}", e);
            }
        }
    }
}

/// Get session from depot
pub fn get_session(depot: &Depot) -> Option<&Session> {
    depot.get::<Session>(SESSION_KEY).ok()
}
