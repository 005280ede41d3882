//! Pagination module
//!
//! # Overview
//!
//! The search endpoint pages with a cursor: the `sequenceId` of the last
//! article on a page is sent back as `sequence_id` to get the next one.
//! [`FullDatasetFetcher`] follows that cursor until the provider reports no
//! more results, taking a slot from a [`RateTracker`](crate::http::RateTracker)
//! before every request.
//!
//! Pages are fetched one after another on the calling task; nothing runs
//! concurrently.

mod fetcher;
mod types;

pub use fetcher::FullDatasetFetcher;
pub use types::{FetchProgress, PageSource, PaginationState};
