//! Response decoder module
//!
//! Supports: JSON, XML
//!
//! # Overview
//!
//! Decoded JSON bodies are narrowed to the records under a dot path.
//! XML documents are converted into a JSON tree (attributes as `@name`, text
//! as `#text`, repeated elements as arrays).

mod decoders;
mod xml;

pub use decoders::{extract_path, JsonDecoder};
pub use xml::xml_to_json;
