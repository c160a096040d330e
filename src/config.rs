//! Session configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default cookie lifetime: 30 days
const DEFAULT_MAX_AGE: i64 = 86400 * 30;

/// SameSite cookie attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    /// Strict - cookie only sent for same-site requests
    Strict,
    /// Lax - cookie sent for same-site requests and top-level navigations
    Lax,
    /// None - cookie sent for all requests (requires Secure)
    None,
}

/// Cookie policy carried by sessions whose identity travels in a cookie.
///
/// These options are persisted with the session, so a session restored from
/// the store re-issues its cookie with the policy it was saved with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Cookie path
    #[serde(rename = "Path", default)]
    pub path: String,

    /// Cookie domain (empty = current domain only)
    #[serde(rename = "Domain", default)]
    pub domain: String,

    /// Max age in seconds.
    /// Zero means no Max-Age attribute (browser session cookie),
    /// negative means delete the cookie now.
    #[serde(rename = "MaxAge", default)]
    pub max_age: i64,

    /// Secure flag
    #[serde(rename = "Secure", default)]
    pub secure: bool,

    /// HttpOnly flag
    #[serde(rename = "HttpOnly", default)]
    pub http_only: bool,

    /// SameSite attribute
    #[serde(rename = "SameSite", default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: String::new(),
            max_age: DEFAULT_MAX_AGE,
            secure: false,
            http_only: true,
            same_site: Some(SameSite::Lax),
        }
    }
}

impl SessionOptions {
    /// Max age as Duration, if the cookie is persistent
    pub fn max_age_duration(&self) -> Option<Duration> {
        (self.max_age > 0).then(|| Duration::from_secs(self.max_age as u64))
    }
}

/// Configuration for a session store
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Secret key(s) for signing identity cookies.
    /// The first secret is used for signing new cookies.
    /// All secrets are tried when verifying signatures (for secret rotation).
    pub secrets: Vec<String>,

    /// Cookie policy given to new sessions
    pub options: SessionOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secrets: vec!["keyboard cat".to_string()],
            options: SessionOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Create a new session configuration with the given secret
    pub fn new<S: Into<String>>(secret: S) -> Self {
        Self {
            secrets: vec![secret.into()],
            ..Default::default()
        }
    }

    /// Create a new session configuration with multiple secrets for rotation
    pub fn with_secrets<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            secrets: secrets.into_iter().map(|s| s.into()).collect(),
            ..Default::default()
        }
    }

    /// Set the cookie path (default: "/")
    pub fn with_cookie_path<S: Into<String>>(mut self, path: S) -> Self {
        self.options.path = path.into();
        self
    }

    /// Set the cookie domain
    pub fn with_cookie_domain<S: Into<String>>(mut self, domain: S) -> Self {
        self.options.domain = domain.into();
        self
    }

    /// Set the HttpOnly flag (default: true)
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.options.http_only = http_only;
        self
    }

    /// Set the Secure flag (default: false)
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.options.secure = secure;
        self
    }

    /// Set the SameSite attribute (default: Lax)
    pub fn with_same_site(mut self, same_site: impl Into<Option<SameSite>>) -> Self {
        self.options.same_site = same_site.into();
        self
    }

    /// Set max age in seconds (default: 30 days)
    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.options.max_age = max_age;
        self
    }

    /// Set max age from Duration
    pub fn with_max_age_duration(mut self, duration: Duration) -> Self {
        self.options.max_age = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        self
    }

    /// Replace the whole cookie policy
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }
}
