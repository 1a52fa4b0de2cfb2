//! Persisted environment document and the session value derived from it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// On-disk document: environment name to connection details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentsDocument {
    /// Registered environments keyed by name.
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentEntry>,
}

/// Connection details for one environment.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentEntry {
    /// Base URL of the runtime (without the `/management` suffix).
    pub url: Url,
    /// User that performed the last login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Bearer token issued by the last login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl EnvironmentEntry {
    /// Entry for a freshly registered environment with no credentials.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            url,
            username: None,
            token: None,
        }
    }
}

impl fmt::Debug for EnvironmentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentEntry")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Authenticated target for one command invocation.
///
/// Produced by a [`crate::CredentialSource`] and borrowed by the API client for
/// every request; the pipeline never mutates it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Environment the session belongs to.
    pub environment: String,
    /// Base URL of the runtime.
    pub base_url: Url,
    /// Bearer token.
    pub token: String,
}

impl Session {
    /// Build a session from its parts.
    #[must_use]
    pub fn new(environment: impl Into<String>, base_url: Url, token: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            base_url,
            token: token.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}
