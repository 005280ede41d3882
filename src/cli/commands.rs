//! CLI commands and argument parsing

use crate::types::ExportFormat;
use crate::webservices::Endpoint;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LexisNexis API command-line client
#[derive(Parser, Debug)]
#[command(name = "lexisnexis-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search Metabase articles
    Search {
        /// Search query
        #[arg(short, long)]
        query: String,

        /// Articles per page
        #[arg(short, long)]
        limit: Option<String>,

        /// Extra search parameter (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Fetch every page, waiting out the per-minute quota when needed
        #[arg(long)]
        full: bool,

        /// Write the articles to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File format for --output
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Columns to keep in Parquet output (comma-separated, empty = all)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Show the rate limits of the Metabase key
    RateLimits,

    /// Count index terms across search results
    IndexTerms {
        /// Search query
        #[arg(short, long)]
        query: String,

        /// Extra search parameter (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Keep only terms in these domains (repeatable)
        #[arg(short, long = "domain")]
        domains: Vec<String>,

        /// Aggregate over every page instead of the first
        #[arg(long)]
        full: bool,

        /// Write the terms to a Parquet file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store a secret in the credential file
    SetKey {
        /// Secret name (e.g. Metabase_Search_Key, WSAPI_CLIENT_ID, WSAPI_SECRET)
        name: String,

        /// Secret value
        value: String,
    },

    /// Call a Web Services endpoint
    Call {
        /// Endpoint name (News, Sources, Dockets, ...)
        endpoint: Endpoint,

        /// Query parameter (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Convert each document's XML content to JSON
        #[arg(long)]
        xml_content: bool,

        /// Print only the records at this path (e.g. `value`)
        #[arg(long)]
        records: Option<String>,
    },
}

/// Parse a `name=value` argument
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{s}'")),
    }
}
