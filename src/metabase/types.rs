//! Metabase request and response types
//!
//! Articles are kept as flexible JSON records; the provider adds and removes
//! fields without notice, so only the fields pagination needs are typed.

use crate::credentials::SecretProvider;
use crate::error::Result;
use crate::types::{JsonObject, JsonValue, METABASE_SEARCH_KEY};
use serde::{Deserialize, Deserializer, Serialize};

/// Query parameter carrying the API key
pub const KEY_PARAM: &str = "key";

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter selecting the response format
pub const FORMAT_PARAM: &str = "format";

/// Query parameter carrying the search query
pub const QUERY_PARAM: &str = "query";

/// Query parameter carrying the continuation cursor
pub const CURSOR_PARAM: &str = "sequence_id";

/// Page size used when none is given
pub const DEFAULT_LIMIT: &str = "10000";

// ============================================================================
// Search Parameters
// ============================================================================

/// Ordered query parameters for the search endpoint
///
/// Always carries `key`, `limit` and `format=json`. The continuation cursor
/// (`sequence_id`) is added and updated in place during pagination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchParameters {
    params: Vec<(String, String)>,
}

impl SearchParameters {
    /// Create parameters with an explicit API key and the default page size
    pub fn new(api_key: impl Into<String>) -> Self {
        let mut params = Self::default();
        params.set(KEY_PARAM, api_key);
        params.set(LIMIT_PARAM, DEFAULT_LIMIT);
        params.set(FORMAT_PARAM, "json");
        params
    }

    /// Build parameters from caller-supplied pairs
    ///
    /// `key` is looked up as `Metabase_Search_Key` only when missing, `limit`
    /// defaults to `10000`, and `format` is always `json`.
    pub fn from_map<I, K, V>(pairs: I, secrets: &dyn SecretProvider) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (name, value) in pairs {
            params.set(name, value);
        }

        if params.get(KEY_PARAM).is_none() {
            let key = secrets.secret(METABASE_SEARCH_KEY)?;
            params.set(KEY_PARAM, key);
        }
        if params.get(LIMIT_PARAM).is_none() {
            params.set(LIMIT_PARAM, DEFAULT_LIMIT);
        }
        params.set(FORMAT_PARAM, "json");
        Ok(params)
    }

    /// Build parameters with only the defaults, resolving the key from `secrets`
    pub fn from_secrets(secrets: &dyn SecretProvider) -> Result<Self> {
        Self::from_map(std::iter::empty::<(String, String)>(), secrets)
    }

    /// Set the search query
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.set(QUERY_PARAM, query);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn limit(mut self, limit: impl Into<String>) -> Self {
        self.set(LIMIT_PARAM, limit);
        self
    }

    /// Insert or replace a parameter, keeping its original position
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.params.push((name, value)),
        }
    }

    /// Get a parameter value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a parameter, returning its value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.params.iter().position(|(n, _)| n == name)?;
        Some(self.params.remove(pos).1)
    }

    /// The API key, if set
    pub fn api_key(&self) -> Option<&str> {
        self.get(KEY_PARAM)
    }

    /// The continuation cursor, if set
    pub fn cursor(&self) -> Option<&str> {
        self.get(CURSOR_PARAM)
    }

    /// Set the continuation cursor
    pub fn set_cursor(&mut self, cursor: impl Into<String>) {
        self.set(CURSOR_PARAM, cursor);
    }

    /// Remove the continuation cursor. Does nothing when none is set.
    pub fn clear_cursor(&mut self) -> Option<String> {
        self.remove(CURSOR_PARAM)
    }

    /// Parameters as ordered pairs
    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameters are set
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

// ============================================================================
// Article
// ============================================================================

/// One article, as a map of whatever fields the provider sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Article(JsonObject);

impl Article {
    /// Wrap a JSON object
    pub fn new(fields: JsonObject) -> Self {
        Self(fields)
    }

    /// Get a field
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    /// The article's `sequenceId`, which may arrive as a string or a number
    pub fn sequence_id(&self) -> Option<String> {
        match self.0.get("sequenceId")? {
            JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The article title
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(JsonValue::as_str)
    }

    /// The article's index terms; malformed entries are skipped
    pub fn index_terms(&self) -> Vec<IndexTerm> {
        self.0
            .get("indexTerms")
            .and_then(JsonValue::as_array)
            .map(|terms| {
                terms
                    .iter()
                    .filter_map(|t| serde_json::from_value(t.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All fields
    pub fn fields(&self) -> &JsonObject {
        &self.0
    }

    /// Unwrap into the underlying JSON object
    pub fn into_inner(self) -> JsonObject {
        self.0
    }
}

impl From<JsonObject> for Article {
    fn from(fields: JsonObject) -> Self {
        Self(fields)
    }
}

/// One index term attached to an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexTerm {
    /// Term name
    pub name: String,

    /// Domains the term belongs to; terms without domains are dropped from projections
    #[serde(default)]
    pub domains: Option<Vec<String>>,

    /// Remaining provider fields (`score`, `code`, ...)
    #[serde(flatten)]
    pub extra: JsonObject,
}

// ============================================================================
// Pages and Results
// ============================================================================

/// One decoded response from the search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Articles on this page, in provider order
    #[serde(default)]
    pub articles: Vec<Article>,

    /// Results remaining as reported by the provider, this page included
    #[serde(
        rename = "totalResults",
        default,
        deserialize_with = "deserialize_count"
    )]
    pub total_results: i64,

    /// HTTP status of the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// URL the page was requested from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,

    /// Every other field the provider sent
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl SearchPage {
    /// Cursor for the next request: the `sequenceId` of the last article
    pub fn last_sequence_id(&self) -> Option<String> {
        self.articles.last().and_then(Article::sequence_id)
    }

    /// Results still to fetch after this page
    pub fn remaining(&self) -> i64 {
        self.total_results - self.articles.len() as i64
    }

    /// Number of articles on this page
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether the page has no articles
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Articles gathered across every page of a search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Concatenated articles
    #[serde(default)]
    pub articles: Vec<Article>,

    /// Number of articles gathered
    #[serde(rename = "totalResults", default)]
    pub total_results: usize,

    /// HTTP status of the last response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// URL of the last request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,

    /// Other provider fields from the last page
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl SearchResult {
    /// Combine accumulated articles with the metadata of the last page seen
    pub fn from_pages(articles: Vec<Article>, last_page: Option<SearchPage>) -> Self {
        let last_page = last_page.unwrap_or_default();
        Self {
            total_results: articles.len(),
            articles,
            status_code: last_page.status_code,
            request_url: last_page.request_url,
            extra: last_page.extra,
        }
    }

    /// The articles
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Number of articles
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether no articles were gathered
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl From<SearchPage> for SearchResult {
    fn from(page: SearchPage) -> Self {
        let articles = page.articles.clone();
        Self::from_pages(articles, Some(page))
    }
}

// ============================================================================
// Rate Limits
// ============================================================================

/// One entry from the rate limit endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    /// Window unit (`SECOND`, `MINUTE`, `DAY`, ...)
    pub unit: String,

    /// Calls allowed per window
    #[serde(default, deserialize_with = "deserialize_count")]
    pub limit: i64,
}

/// Body of the rate limit endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RateLimitsResponse {
    #[serde(rename = "rateLimits")]
    pub rate_limits: Vec<RateLimit>,
}

/// Accept a count as a JSON number or a numeric string
fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match JsonValue::deserialize(deserializer)? {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| D::Error::custom(format!("count out of range: {n}"))),
        JsonValue::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("count is not a number: {s:?}"))),
        JsonValue::Null => Ok(0),
        other => Err(D::Error::custom(format!("unexpected count value: {other}"))),
    }
}
