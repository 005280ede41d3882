//! Web Services client and response helpers

use super::endpoints::Endpoint;
use crate::auth::AuthConfig;
use crate::config::ClientConfig;
use crate::credentials::SecretProvider;
use crate::decode::xml_to_json;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::{WSAPI_CLIENT_ID, WSAPI_SECRET};
use base64::Engine;
use serde_json::Value;
use tracing::{debug, instrument};

/// Client for the OAuth2-protected Web Services endpoints
#[derive(Debug)]
pub struct WebServicesClient {
    http: HttpClient,
    base_url: String,
}

impl WebServicesClient {
    /// Create a client with explicit authentication
    pub fn new(config: &ClientConfig, auth: AuthConfig) -> Result<Self> {
        let http = HttpClient::with_auth(config.http_config(), auth)?;
        Ok(Self {
            http,
            base_url: config.webservices_url.clone(),
        })
    }

    /// Create a client using the `WSAPI_CLIENT_ID` / `WSAPI_SECRET` secrets
    pub fn from_secrets(config: &ClientConfig, secrets: &dyn SecretProvider) -> Result<Self> {
        let client_id = secrets.secret(WSAPI_CLIENT_ID)?;
        let client_secret = secrets.secret(WSAPI_SECRET)?;
        let scope = (!config.token_scope.is_empty()).then(|| config.token_scope.clone());

        Self::new(
            config,
            AuthConfig::client_credentials(&config.token_url, client_id, client_secret, scope),
        )
    }

    /// Current access token, requesting one if none is cached
    pub async fn access_token(&self) -> Result<String> {
        self.http
            .authenticator()
            .ok_or_else(|| Error::auth("client has no authenticator"))?
            .access_token()
            .await
    }

    /// Call an endpoint and decode its JSON body; a non-success status is an error
    #[instrument(skip(self, query), fields(endpoint = %endpoint), err)]
    pub async fn call<I, K, V>(&self, endpoint: Endpoint, query: I) -> Result<Value>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let request = RequestConfig::new()
            .header("Accept", "application/json")
            .queries(query);
        let data: Value = self
            .http
            .get_json_with_config(&endpoint.url(&self.base_url), request)
            .await?;
        debug!("Endpoint call succeeded");
        Ok(data)
    }
}

/// Replace each `value[].Document.Content` XML string with its JSON tree
///
/// Returns how many documents were converted. Entries without string content
/// are left alone.
pub fn convert_xml_content(data: &mut Value) -> Result<usize> {
    let entries = data
        .get_mut("value")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| Error::decode("response has no 'value' array"))?;

    let mut converted = 0;
    for entry in entries {
        let Some(content) = entry.pointer_mut("/Document/Content") else {
            continue;
        };
        let Some(xml) = content.as_str() else {
            continue;
        };
        let parsed = xml_to_json(xml)?;
        *content = parsed;
        converted += 1;
    }

    debug!(converted, "Converted document content from XML");
    Ok(converted)
}

/// Base64-encode a string (standard alphabet, padded)
pub fn encode_base64(message: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(message)
}
