//! HTTP client module
//!
//! Provides the HTTP client and per-minute rate tracking.
//!
//! # Features
//!
//! - **Request shaping**: Base URL, default headers, ordered query parameters, form/JSON bodies
//! - **Authentication**: Integration with the auth module
//! - **Rate Tracking**: Wall-clock minute windows learned from the provider's quota
//!
//! Requests are never retried; errors surface to the caller.

mod client;
mod rate_limit;

pub use client::{read_body, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{
    Clock, ManualClock, RateTracker, SystemClock, DEFAULT_POLL_INTERVAL, MINUTE_UNIT,
};
