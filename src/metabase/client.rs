//! Metabase HTTP client
//!
//! One method per endpoint. `search` returns a single page; `search_all`
//! hands the parameters to the full-dataset fetcher.

use super::types::{RateLimit, RateLimitsResponse, SearchPage, SearchParameters, SearchResult};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{read_body, HttpClient, RequestConfig};
use crate::pagination::{FullDatasetFetcher, PageSource};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for the Metabase search and rate limit endpoints
#[derive(Debug)]
pub struct MetabaseClient {
    http: HttpClient,
    search_url: String,
    rate_limit_url: String,
    window_poll_interval: Duration,
}

impl MetabaseClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = HttpClient::with_config(config.http_config())?;
        Ok(Self::with_http(http, config))
    }

    /// Create a client around an existing HTTP client
    pub fn with_http(http: HttpClient, config: &ClientConfig) -> Self {
        Self {
            http,
            search_url: config.search_url(),
            rate_limit_url: config.rate_limit_url(),
            window_poll_interval: config.window_poll_interval(),
        }
    }

    /// Search endpoint URL
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Fetch one page of results
    ///
    /// A non-success status is logged with the raw body and whatever decodes
    /// is returned. A body that is not JSON is a decode error.
    #[instrument(
        level = "debug",
        skip_all,
        fields(query = params.get("query"), cursor = params.cursor()),
        err
    )]
    pub async fn search(&self, params: &SearchParameters) -> Result<SearchPage> {
        let request = RequestConfig::new().queries(params.pairs().iter().cloned());
        let response = self.http.get_with_config(&self.search_url, request).await?;

        // The query string carries the API key
        let mut request_url = response.url().clone();
        request_url.set_query(None);

        let (status, body) = read_body(response).await?;
        if !(200..300).contains(&status) {
            warn!(status, body = %body, "Search request returned an error status");
        }

        let mut page: SearchPage = serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Search response is not valid JSON: {e}")))?;
        page.status_code = Some(status);
        page.request_url = Some(request_url.to_string());

        debug!(
            articles = page.articles.len(),
            total_results = page.total_results,
            "Decoded search page"
        );
        Ok(page)
    }

    /// Ask the provider for the key's rate limits
    #[instrument(level = "debug", skip_all, err)]
    pub async fn rate_limits(&self, api_key: &str) -> Result<Vec<RateLimit>> {
        let response = self
            .http
            .get_with_config(&self.rate_limit_url, RequestConfig::new().query("key", api_key))
            .await?;
        let (status, body) = read_body(response).await?;

        if !(200..300).contains(&status) {
            return Err(Error::rate_lookup(format!(
                "rate limit endpoint returned {status}: {body}"
            )));
        }

        let parsed: RateLimitsResponse = serde_json::from_str(&body).map_err(|e| {
            Error::rate_lookup(format!("rate limit response has no usable rateLimits: {e}"))
        })?;
        debug!(entries = parsed.rate_limits.len(), "Fetched rate limits");
        Ok(parsed.rate_limits)
    }

    /// Fetch every page of a search, respecting the per-minute quota
    ///
    /// `params` is left holding the last cursor used.
    pub async fn search_all(&self, params: &mut SearchParameters) -> Result<SearchResult> {
        FullDatasetFetcher::new(self)
            .with_poll_interval(self.window_poll_interval)
            .fetch_full_dataset(params)
            .await
    }
}

#[async_trait]
impl PageSource for MetabaseClient {
    async fn fetch_page(&self, params: &SearchParameters) -> Result<SearchPage> {
        self.search(params).await
    }

    async fn rate_limits(&self, api_key: &str) -> Result<Vec<RateLimit>> {
        MetabaseClient::rate_limits(self, api_key).await
    }
}
