//! Credential module
//!
//! Named secrets (API keys, OAuth2 client credentials) kept in a single JSON
//! file under the user's home directory.
//!
//! # Overview
//!
//! - `CredentialStore` - File-backed store, created lazily, filled by prompting on a miss
//! - `SecretPrompt` - Asks the user for a missing secret
//! - `SecretProvider` - What the clients depend on to resolve a secret by name

mod prompt;
mod store;

pub use prompt::{NoPrompt, SecretPrompt, StdinPrompt};
pub use store::{set_metabase_search_key, CredentialStore, SecretProvider, StaticSecrets};

#[cfg(test)]
mod tests;
