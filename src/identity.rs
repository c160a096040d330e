//! Session identity transports
//!
//! A transport decides where a session ID travels between client and server:
//! in a request header supplied by the caller ([`HeaderTransport`]) or in a
//! signed cookie issued by the store ([`CookieTransport`]).

use salvo_core::http::cookie::{self, Cookie};
use salvo_core::{Request, Response};

use crate::config::{SameSite, SessionConfig, SessionOptions};
use crate::cookie_signature::{sign, unsign_with_secrets};

/// Strategy for reading and writing session IDs on HTTP messages
pub trait IdentityTransport: Send + Sync + 'static {
    /// Read the session ID for `name` from the request.
    ///
    /// A missing or unusable ID is `None`; it simply means the session is new.
    fn resolve_incoming_id(&self, req: &Request, name: &str) -> Option<String>;

    /// Attach the session ID for `name` to the response
    fn bind_outgoing_id(&self, res: &mut Response, name: &str, id: &str, options: &SessionOptions);

    /// Whether sessions on this transport carry and persist cookie options
    fn carries_options(&self) -> bool;
}

/// Session ID read from a request header named after the session.
///
/// The client is responsible for sending the header; nothing is written to
/// the response.
#[derive(Clone, Debug, Default)]
pub struct HeaderTransport;

impl IdentityTransport for HeaderTransport {
    fn resolve_incoming_id(&self, req: &Request, name: &str) -> Option<String> {
        let value = req.headers().get(name)?.to_str().ok()?;
        if value.is_empty() {
            return None;
        }
        Some(value.to_string())
    }

    fn bind_outgoing_id(&self, _res: &mut Response, _name: &str, _id: &str, _options: &SessionOptions) {}

    fn carries_options(&self) -> bool {
        false
    }
}

/// Session ID carried in a signed cookie named after the session
#[derive(Clone, Debug)]
pub struct CookieTransport {
    secrets: Vec<String>,
}

impl CookieTransport {
    /// Create a cookie transport signing with the first secret and
    /// verifying with any of them
    pub fn new<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            secrets: secrets.into_iter().map(|s| s.into()).collect(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.secrets.iter().cloned())
    }
}

impl IdentityTransport for CookieTransport {
    fn resolve_incoming_id(&self, req: &Request, name: &str) -> Option<String> {
        let raw = req.cookie(name)?.value();

        // Cookie values may arrive URL encoded
        let decoded = match urlencoding::decode(raw) {
            Ok(d) => d.into_owned(),
            Err(_) => raw.to_string(),
        };

        let id = unsign_with_secrets(name, &decoded, &self.secrets);
        if id.is_none() {
            tracing::debug!(session = name, "Ignoring session cookie with invalid signature");
        }
        id.filter(|id| !id.is_empty())
    }

    fn bind_outgoing_id(&self, res: &mut Response, name: &str, id: &str, options: &SessionOptions) {
        let Some(secret) = self.secrets.first() else {
            tracing::error!(session = name, "No cookie secret configured, session cookie not set");
            return;
        };
        let signed = sign(name, id, secret);

        let mut cookie_builder = Cookie::build((name.to_string(), signed))
            .path(options.path.clone())
            .http_only(options.http_only)
            .secure(options.secure);

        if !options.domain.is_empty() {
            cookie_builder = cookie_builder.domain(options.domain.clone());
        }

        if options.max_age < 0 {
            cookie_builder = cookie_builder.max_age(cookie::time::Duration::ZERO);
        } else if options.max_age > 0 {
            cookie_builder = cookie_builder.max_age(cookie::time::Duration::seconds(options.max_age));
        }

        if let Some(same_site) = options.same_site {
            cookie_builder = cookie_builder.same_site(match same_site {
                SameSite::Strict => cookie::SameSite::Strict,
                SameSite::Lax => cookie::SameSite::Lax,
                SameSite::None => cookie::SameSite::None,
            });
        }

        res.add_cookie(cookie_builder.build());
    }

    fn carries_options(&self) -> bool {
        true
    }
}
