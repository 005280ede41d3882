//! Auth configuration types

use chrono::{DateTime, Utc};

/// Seconds before expiry at which a cached token is treated as expired
pub const EXPIRY_BUFFER_SECS: i64 = 30;

/// OAuth2 client credentials; the client authenticates with HTTP Basic
#[derive(Clone)]
pub struct AuthConfig {
    /// Token endpoint URL
    pub token_url: String,
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Requested scope (space separated)
    pub scope: Option<String>,
}

impl AuthConfig {
    /// Create a client credentials config
    pub fn client_credentials(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: Option<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with buffer)
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            Utc::now() + chrono::Duration::seconds(EXPIRY_BUFFER_SECS) >= expires_at
        })
    }
}
