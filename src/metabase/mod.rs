//! Metabase search API
//!
//! # Overview
//!
//! The search endpoint returns up to `limit` articles per call together with
//! `totalResults`, the number of results left including that page. Each
//! article carries a `sequenceId`; sending the last one back as
//! `sequence_id` continues the result stream.
//!
//! The rate limit endpoint reports the key's quotas as
//! `{"rateLimits": [{"unit": "MINUTE", "limit": N}, ...]}`.

mod client;
mod types;

pub use client::MetabaseClient;
pub use types::{
    Article, IndexTerm, RateLimit, SearchPage, SearchParameters, SearchResult, CURSOR_PARAM,
    DEFAULT_LIMIT, FORMAT_PARAM, KEY_PARAM, LIMIT_PARAM, QUERY_PARAM,
};
