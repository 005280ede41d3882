//! LexisNexis Web Services API
//!
//! Requests carry a bearer token obtained with the OAuth2 client credentials
//! flow. Document bodies arrive as XML inside the JSON response and can be
//! converted in place with [`convert_xml_content`].

mod client;
mod endpoints;

pub use client::{convert_xml_content, encode_base64, WebServicesClient};
pub use endpoints::Endpoint;

#[cfg(test)]
mod tests;
