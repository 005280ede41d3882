//! Error types for the LexisNexis API client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::metabase::SearchResult;
use thiserror::Error;

/// The main error type for the LexisNexis API client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Credential / Authentication Errors
    // ============================================================================
    #[error("Credential store error: {message}")]
    Credential { message: String },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("OAuth2 error: {message}")]
    OAuth2 { message: String },

    // ============================================================================
    // Rate Limit Errors
    // ============================================================================
    #[error("Rate limit lookup failed: {message}")]
    RateLookup { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("XML parsing error: {message}")]
    XmlParse { message: String },

    #[error("Pagination aborted on page {iteration}: {message}")]
    Pagination {
        iteration: u32,
        message: String,
        partial: Box<SearchResult>,
    },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a credential store error
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a rate lookup error
    pub fn rate_lookup(message: impl Into<String>) -> Self {
        Self::RateLookup {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an XML parse error
    pub fn xml(message: impl Into<String>) -> Self {
        Self::XmlParse {
            message: message.into(),
        }
    }

    /// Create a pagination error that keeps what was accumulated so far
    pub fn pagination(iteration: u32, message: impl Into<String>, partial: SearchResult) -> Self {
        Self::Pagination {
            iteration,
            message: message.into(),
            partial: Box::new(partial),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Error kind name, grouping variants the way callers reason about them
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config { .. } | Error::YamlParse(_) => "ConfigError",
            Error::Credential { .. } => "CredentialError",
            Error::Auth { .. } | Error::OAuth2 { .. } => "AuthError",
            Error::RateLookup { .. } => "RateLookupError",
            Error::Http(_) | Error::Timeout { .. } | Error::InvalidUrl(_) => "TransportError",
            Error::HttpStatus { .. } => "HttpStatusError",
            Error::JsonParse(_) | Error::Decode { .. } | Error::XmlParse { .. } => "DecodeError",
            Error::Pagination { .. } => "PaginationError",
            Error::Arrow(_) | Error::Parquet(_) | Error::Output { .. } => "OutputError",
            Error::Io(_) => "IoError",
            Error::Other(_) => "Error",
        }
    }

    /// Articles gathered before a pagination abort
    pub fn partial_result(&self) -> Option<&SearchResult> {
        match self {
            Error::Pagination { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// Take ownership of the partial result of a pagination abort
    pub fn into_partial_result(self) -> Option<SearchResult> {
        match self {
            Error::Pagination { partial, .. } => Some(*partial),
            _ => None,
        }
    }
}

/// Result type alias for the LexisNexis API client
pub type Result<T> = std::result::Result<T, Error>;
