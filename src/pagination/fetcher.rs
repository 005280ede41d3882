//! Full-dataset fetcher
//!
//! Drives the page loop: take a rate slot, fetch a page, accumulate its
//! articles, carry the last `sequenceId` forward, and stop once the provider's
//! `totalResults` minus the page size reaches zero.
//!
//! Termination follows the provider's counts page by page. If those counts
//! drift from the real page sizes the loop stops early or late accordingly.

use super::types::{FetchProgress, PageSource, PaginationState};
use crate::error::{Error, Result};
use crate::http::{Clock, RateTracker, SystemClock, DEFAULT_POLL_INTERVAL};
use crate::metabase::{Article, SearchPage, SearchParameters, SearchResult};
use std::time::Duration;
use tracing::{debug, info, instrument};

type ProgressCallback<'a> = Box<dyn FnMut(&FetchProgress) + Send + 'a>;

/// Fetches every page of a search through a [`PageSource`]
pub struct FullDatasetFetcher<'a, S: PageSource + ?Sized, C: Clock = SystemClock> {
    source: &'a S,
    clock: C,
    poll_interval: Duration,
    on_progress: Option<ProgressCallback<'a>>,
}

impl<'a, S: PageSource + ?Sized> FullDatasetFetcher<'a, S, SystemClock> {
    /// Create a fetcher using the local wall clock
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            clock: SystemClock,
            poll_interval: DEFAULT_POLL_INTERVAL,
            on_progress: None,
        }
    }
}

impl<'a, S: PageSource + ?Sized, C: Clock + Clone> FullDatasetFetcher<'a, S, C> {
    /// Use a different clock for the rate window
    pub fn with_clock<C2: Clock + Clone>(self, clock: C2) -> FullDatasetFetcher<'a, S, C2> {
        FullDatasetFetcher {
            source: self.source,
            clock,
            poll_interval: self.poll_interval,
            on_progress: self.on_progress,
        }
    }

    /// Set how often the minute is re-checked while waiting for a new window
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Call `callback` after every page
    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&FetchProgress) + Send + 'a,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Fetch pages until the result set is exhausted
    ///
    /// Any `sequence_id` already in `params` is dropped first; afterwards
    /// `params` holds the last cursor used. The rate limits are looked up once
    /// per call.
    ///
    /// A page answered with a non-success status, or one that yields no
    /// cursor while results remain, aborts with [`Error::Pagination`], which
    /// carries every article gathered so far.
    #[instrument(skip_all, fields(query = params.get("query")), err)]
    pub async fn fetch_full_dataset(
        &mut self,
        params: &mut SearchParameters,
    ) -> Result<SearchResult> {
        if let Some(stale) = params.clear_cursor() {
            debug!(cursor = %stale, "Dropped cursor left from an earlier search");
        }

        let api_key = params
            .api_key()
            .ok_or_else(|| Error::credential("search parameters have no API key"))?
            .to_string();
        let mut tracker = RateTracker::initialize(self.source, &api_key, self.clock.clone())
            .await?
            .with_poll_interval(self.poll_interval);

        let mut state = PaginationState::new();
        let mut articles: Vec<Article> = Vec::new();
        let mut last_page: Option<SearchPage> = None;

        while state.should_continue() {
            state.iteration += 1;
            let calls_left = tracker.consume_slot().await;

            let mut page = self.source.fetch_page(params).await?;

            // An error body decodes as an empty page and would end the loop early
            if let Some(status) = page.status_code.filter(|s| !(200..300).contains(s)) {
                return Err(Error::pagination(
                    state.iteration,
                    format!("page request returned status {status}"),
                    SearchResult::from_pages(articles, last_page),
                ));
            }

            let page_size = page.len();
            let reported_total = page.total_results;
            let remaining = page.remaining();
            let cursor = page.last_sequence_id();

            articles.append(&mut page.articles);
            state.record_page(page_size, remaining);
            last_page = Some(page);

            match cursor {
                Some(cursor) => {
                    params.set_cursor(cursor.as_str());
                    state.cursor = Some(cursor);
                }
                None if remaining > 0 => {
                    let message = if page_size == 0 {
                        format!("empty page while {remaining} results remain")
                    } else {
                        format!("last article has no sequenceId while {remaining} results remain")
                    };
                    return Err(Error::pagination(
                        state.iteration,
                        message,
                        SearchResult::from_pages(articles, last_page),
                    ));
                }
                None => {}
            }

            let progress = state.progress(page_size, reported_total);
            info!(
                iteration = progress.iteration,
                fetched = progress.fetched,
                cursor = progress.cursor.as_deref(),
                reported_total,
                remaining,
                calls_left,
                "Fetched page"
            );
            if let Some(callback) = self.on_progress.as_mut() {
                callback(&progress);
            }
        }

        info!(
            total = articles.len(),
            pages = state.iteration,
            "Full dataset fetched"
        );
        Ok(SearchResult::from_pages(articles, last_page))
    }
}

impl<S: PageSource + ?Sized, C: Clock> std::fmt::Debug for FullDatasetFetcher<'_, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullDatasetFetcher")
            .field("poll_interval", &self.poll_interval)
            .field("has_progress_callback", &self.on_progress.is_some())
            .finish_non_exhaustive()
    }
}
