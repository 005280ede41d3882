// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # LexisNexis API client
//!
//! Client for the Metabase news search API and the authenticated
//! LexisNexis Web Services endpoints.
//!
//! ## Features
//!
//! - **Single-page search**: One parameterized request, decoded into a flexible page
//! - **Full-dataset pagination**: Follows the `sequence_id` cursor until the result set is exhausted
//! - **Rate gating**: Learns the per-minute quota once and sleeps until the next minute when it runs out
//! - **Credentials**: JSON secret store under `~/.lnapi`, filled interactively on first miss
//! - **Arrow output**: Articles and aggregated index terms as Arrow RecordBatches / Parquet
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lexisnexis_api::{ClientConfig, CredentialStore, MetabaseClient, SearchParameters, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::load(None)?;
//!     let store = CredentialStore::new(&config.credentials_path);
//!     let client = MetabaseClient::new(&config)?;
//!
//!     let mut params = SearchParameters::from_secrets(&store)?.query("title:\"climate\"");
//!     let result = client.search_all(&mut params).await?;
//!     println!("{} articles", result.total_results);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 FullDatasetFetcher (pagination)              │
//! │   consume_slot() → fetch_page() → accumulate → next cursor   │
//! └──────────────────────────────────────────────────────────────┘
//!            │                         │
//! ┌──────────┴─────────┐   ┌───────────┴───────────┐   ┌────────────────┐
//! │ RateTracker (http) │   │ MetabaseClient        │   │ Output         │
//! │ minute window      │   │ searchArticles        │   │ Arrow, Parquet │
//! │ Clock              │   │ rateLimits            │   │ index terms    │
//! └────────────────────┘   └───────────────────────┘   └────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// Secret storage and prompting
pub mod credentials;

/// Authentication for the Web Services API
pub mod auth;

/// HTTP client and per-minute rate tracking
pub mod http;

/// Response decoders (JSON, XML)
pub mod decode;

/// Metabase search API
pub mod metabase;

/// Rate-gated full-dataset pagination
pub mod pagination;

/// Arrow/Parquet output and result projections
pub mod output;

/// LexisNexis Web Services API
pub mod webservices;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ClientConfig;
pub use credentials::{CredentialStore, SecretProvider, StaticSecrets};
pub use error::{Error, Result};
pub use metabase::{Article, MetabaseClient, SearchPage, SearchParameters, SearchResult};
pub use pagination::FullDatasetFetcher;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
