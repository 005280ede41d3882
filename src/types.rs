//! Common types used throughout the crate
//!
//! Shared type aliases and small enums used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Well-known secret names
// ============================================================================

/// Secret holding the Metabase search key
pub const METABASE_SEARCH_KEY: &str = "Metabase_Search_Key";

/// Secret holding the Web Services OAuth2 client id
pub const WSAPI_CLIENT_ID: &str = "WSAPI_CLIENT_ID";

/// Secret holding the Web Services OAuth2 client secret
pub const WSAPI_SECRET: &str = "WSAPI_SECRET";

// ============================================================================
// Export Format
// ============================================================================

/// File format for exported articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON array of articles
    #[default]
    Json,
    /// Parquet file of the article table
    Parquet,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "parquet" => Ok(Self::Parquet),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}
