//! Client configuration
//!
//! Endpoint locations, request defaults and local paths. Values come from
//! built-in defaults, an optional YAML file, then `LNAPI_*` environment
//! variables, in that order.

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the user's home that holds local state
pub const CONFIG_DIR_NAME: &str = ".lnapi";

/// Credential file name inside [`CONFIG_DIR_NAME`]
pub const CREDENTIALS_FILE_NAME: &str = ".cred";

// ============================================================================
// Client Config
// ============================================================================

/// Runtime configuration shared by the Metabase and Web Services clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the Metabase API
    pub metabase_url: String,

    /// Search endpoint path, relative to `metabase_url`
    pub search_path: String,

    /// Rate limit endpoint path, relative to `metabase_url`
    pub rate_limit_path: String,

    /// Page size used when the caller does not set `limit`
    pub default_limit: String,

    /// Base URL of the Web Services API
    pub webservices_url: String,

    /// OAuth2 token endpoint for the Web Services API
    pub token_url: String,

    /// OAuth2 scope requested for the Web Services API
    pub token_scope: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Poll interval while waiting for a new rate window, in milliseconds
    pub window_poll_ms: u64,

    /// Location of the JSON credential file
    pub credentials_path: PathBuf,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            metabase_url: default_metabase_url(),
            search_path: "searchArticles".to_string(),
            rate_limit_path: "rateLimits".to_string(),
            default_limit: "10000".to_string(),
            webservices_url: default_webservices_url(),
            token_url: "https://auth-api.lexisnexis.com/oauth/v2/token".to_string(),
            token_scope: "http://oauth.lexisnexis.com/all".to_string(),
            timeout_secs: 30,
            window_poll_ms: 1000,
            credentials_path: default_credentials_path(),
            user_agent: format!("lexisnexis-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

fn default_metabase_url() -> String {
    "https://metabase.moreover.com/api/v10/".to_string()
}

fn default_webservices_url() -> String {
    "https://services-api.lexisnexis.com/v1/".to_string()
}

/// Default credential file: `~/.lnapi/.cred`
pub fn default_credentials_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CREDENTIALS_FILE_NAME)
}

impl ClientConfig {
    /// Load configuration: defaults, then the YAML file (if given), then env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `LNAPI_*` overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LNAPI_METABASE_URL") {
            self.metabase_url = url;
        }
        if let Some(url) = lookup("LNAPI_WEBSERVICES_URL") {
            self.webservices_url = url;
        }
        if let Some(url) = lookup("LNAPI_TOKEN_URL") {
            self.token_url = url;
        }
        if let Some(path) = lookup("LNAPI_CREDENTIALS_PATH") {
            self.credentials_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("LNAPI_TIMEOUT_SECS") {
            self.timeout_secs = secs.parse().map_err(|_| {
                Error::config(format!("LNAPI_TIMEOUT_SECS is not a number: {secs}"))
            })?;
        }
        Ok(())
    }

    /// Full URL of the search endpoint
    pub fn search_url(&self) -> String {
        join_url(&self.metabase_url, &self.search_path)
    }

    /// Full URL of the rate limit endpoint
    pub fn rate_limit_url(&self) -> String {
        join_url(&self.metabase_url, &self.rate_limit_path)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Poll interval for the rate window wait
    pub fn window_poll_interval(&self) -> Duration {
        Duration::from_millis(self.window_poll_ms)
    }

    /// HTTP client settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .timeout(self.timeout())
            .user_agent(&self.user_agent)
            .build()
    }
}

/// Join a base URL and a relative path with exactly one slash
pub fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
