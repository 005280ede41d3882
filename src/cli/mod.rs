//! CLI module
//!
//! Command-line interface over the Metabase and Web Services clients.
//!
//! # Commands
//!
//! - `search` - Run a Metabase search, one page or the full dataset
//! - `rate-limits` - Show the quota of the stored search key
//! - `index-terms` - Count index terms across search results
//! - `set-key` - Store a secret in the credential file
//! - `call` - Call a Web Services endpoint

mod commands;
mod runner;

pub use commands::{parse_key_value, Cli, Commands};
pub use runner::Runner;
