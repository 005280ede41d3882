//! Authentication module
//!
//! Supports: OAuth2 client credentials (HTTP Basic client auth)
//!
//! The `Authenticator` adds a bearer token to outgoing requests and caches
//! the access token until shortly before it expires.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken};
