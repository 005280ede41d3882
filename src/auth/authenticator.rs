//! Authenticator implementation
//!
//! Attaches OAuth2 bearer tokens to requests and manages token refresh.

use super::types::{AuthConfig, CachedToken};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Fetches, caches and attaches client credentials access tokens
pub struct Authenticator {
    /// Client credentials
    config: AuthConfig,
    /// Cached OAuth2 token
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create an authenticator that requests tokens through `http_client`
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Add the bearer token to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(req.bearer_auth(token))
    }

    /// Get a valid access token, requesting a new one if the cache is empty or stale
    pub async fn access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_client_credentials().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Fetch an OAuth2 token using the client credentials flow
    #[instrument(
        level = "debug",
        skip_all,
        fields(token_url = %self.config.token_url, client_id = %self.config.client_id),
        err
    )]
    async fn fetch_client_credentials(&self) -> Result<CachedToken> {
        let config = &self.config;
        let mut form = vec![("grant_type", "client_credentials")];
        if let Some(scope) = config.scope.as_deref() {
            form.push(("scope", scope));
        }

        let response = self
            .http_client
            .post(&config.token_url)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::OAuth2 {
                message: format!("Token request failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| Error::OAuth2 {
            message: format!("Invalid token response: {e}"),
        })?;
        debug!(expires_in = ?token_response.expires_in, "Obtained access token");
        Ok(token_response.into_cached_token())
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}
