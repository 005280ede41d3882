//! Pagination types and traits
//!
//! Defines the page source seam and the bookkeeping carried between pages.

use crate::error::Result;
use crate::metabase::{RateLimit, SearchPage, SearchParameters};
use async_trait::async_trait;

/// Anything that can serve search pages and report rate limits
///
/// Implemented by [`MetabaseClient`](crate::metabase::MetabaseClient); tests
/// script their own pages through it.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page for the given parameters
    async fn fetch_page(&self, params: &SearchParameters) -> Result<SearchPage>;

    /// Rate limit entries for the API key
    async fn rate_limits(&self, api_key: &str) -> Result<Vec<RateLimit>>;
}

/// State of a full-dataset fetch between pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Pages fetched so far
    pub iteration: u32,

    /// Cursor sent with the next request
    pub cursor: Option<String>,

    /// Results left according to the last page (reported total minus page size)
    pub remaining: i64,

    /// Articles accumulated so far
    pub total_fetched: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationState {
    /// Fresh state; `remaining` starts at 1 so the first page is always fetched
    pub fn new() -> Self {
        Self {
            iteration: 0,
            cursor: None,
            remaining: 1,
            total_fetched: 0,
        }
    }

    /// Whether another page should be requested
    pub fn should_continue(&self) -> bool {
        self.remaining > 0
    }

    /// Record a fetched page
    pub fn record_page(&mut self, page_size: usize, remaining: i64) {
        self.total_fetched += page_size;
        self.remaining = remaining;
    }

    /// Snapshot for progress reporting
    pub fn progress(&self, page_size: usize, reported_total: i64) -> FetchProgress {
        FetchProgress {
            iteration: self.iteration,
            fetched: self.total_fetched,
            page_size,
            reported_total,
            remaining: self.remaining,
            cursor: self.cursor.clone(),
        }
    }
}

/// Progress after one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchProgress {
    /// Page number, starting at 1
    pub iteration: u32,
    /// Articles accumulated so far
    pub fetched: usize,
    /// Articles on this page
    pub page_size: usize,
    /// `totalResults` the provider reported for this page
    pub reported_total: i64,
    /// Results left after this page
    pub remaining: i64,
    /// Cursor for the next page
    pub cursor: Option<String>,
}
