//! HTTP client
//!
//! Thin wrapper over `reqwest` that handles:
//! - User agent and timeout
//! - Authentication through the auth module
//! - Transport error classification
//!
//! Nothing is retried: a failed request surfaces to the caller.

use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("lexisnexis-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, sent in insertion order
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn queries<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// HTTP client with optional authentication
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Authenticator>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator: None,
        })
    }

    /// Create a client that sends an OAuth2 bearer token with every request
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.authenticator = Some(Authenticator::with_client(auth_config, client.client.clone()));
        Ok(client)
    }

    /// Get the authenticator, if any
    pub fn authenticator(&self) -> Option<&Authenticator> {
        self.authenticator.as_ref()
    }

    /// Make a GET request. Any status is returned as-is; only transport failures are errors.
    pub async fn get_with_config(&self, url: &str, config: RequestConfig) -> Result<Response> {
        let mut req = self.client.get(url);

        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        if let Some(ref auth) = self.authenticator {
            req = auth.apply(req).await?;
        }

        match req.send().await {
            Ok(response) => {
                debug!("GET {} -> {}", url, response.status().as_u16());
                Ok(response)
            }
            Err(e) if e.is_timeout() => Err(Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }),
            Err(e) => Err(Error::Http(e)),
        }
    }

    /// Make a GET request and parse the JSON response; a non-success status is an error
    pub async fn get_json_with_config<T: DeserializeOwned>(
        &self,
        url: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.get_with_config(url, config).await?;
        let (status, body) = read_body(response).await?;
        if !(200..300).contains(&status) {
            return Err(Error::http_status(status, body));
        }
        serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON response: {e}")))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .finish_non_exhaustive()
    }
}

/// Read status and body text from a response
pub async fn read_body(response: Response) -> Result<(u16, String)> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(Error::Http)?;
    Ok((status, body))
}
