//! Output module
//!
//! Turns search results into Arrow RecordBatches and writes them out.
//!
//! # Overview
//!
//! - Inferring Arrow schemas from JSON records
//! - Article tables and index term aggregations
//! - Writing JSON and Parquet files

mod projection;
mod schema;
mod writer;

pub use projection::{
    aggregate_index_terms, article_index_terms, articles_table, index_terms_table, IndexTermCount,
};
pub use schema::{infer_schema, json_to_arrow};
pub use writer::{write_articles_json, write_parquet, ParquetWriterConfig};

#[cfg(test)]
mod tests;
