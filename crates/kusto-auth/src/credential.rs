//! Credential capability produced by the resolver.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Default scope for Kusto (Azure Data Explorer) clusters.
pub const KUSTO_DEFAULT_SCOPE: &str = "https://kusto.kusto.windows.net/.default";

/// Build the token scope for a specific cluster URL.
///
/// ```rust
/// use kusto_auth::kusto_scope;
///
/// assert_eq!(
///     kusto_scope("https://help.kusto.windows.net/"),
///     "https://help.kusto.windows.net/.default"
/// );
/// ```
#[must_use]
pub fn kusto_scope(cluster_url: &str) -> String {
    format!("{}/.default", cluster_url.trim_end_matches('/'))
}

/// A bearer token.
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    expires_in: Option<Duration>,
}

impl AccessToken {
    /// Create a token with unknown expiration.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_in: None,
        }
    }

    /// Create a token that expires after `expires_in`.
    pub fn with_expiry(token: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            token: token.into(),
            expires_in: Some(expires_in),
        }
    }

    /// The raw token, for use in an `Authorization: Bearer` header.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.token
    }

    /// Time remaining until expiration, as reported when the token was issued.
    #[must_use]
    pub fn expires_in(&self) -> Option<Duration> {
        self.expires_in
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Something that can produce bearer tokens.
///
/// Implementations belong to an identity backend; the resolver never looks
/// inside them. Any blocking, prompting, polling, or caching happens here.
#[async_trait]
pub trait TokenCredential: Send + Sync + fmt::Debug {
    /// Acquire a token for the given scopes.
    async fn get_token(&self, scopes: &[&str]) -> kusto_error::Result<AccessToken>;
}

/// The value returned by a successful resolution.
pub type CredentialCapability = Arc<dyn TokenCredential>;
