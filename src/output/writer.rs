//! File writers
//!
//! JSON for raw articles, Parquet for Arrow batches.

use crate::error::{Error, Result};
use crate::metabase::Article;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, instrument};

/// Configuration for the Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a config with SNAPPY compression
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Write articles to `path` as a pretty-printed JSON array
///
/// Returns the number of articles written. With no articles nothing is
/// written and 0 is returned.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()), err)]
pub fn write_articles_json(path: impl AsRef<Path>, articles: &[Article]) -> Result<usize> {
    let path = path.as_ref();
    if articles.is_empty() {
        info!("No articles to write");
        return Ok(0);
    }

    let file = File::create(path).map_err(|e| {
        Error::output(format!("Failed to create {}: {e}", path.display()))
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, articles)
        .map_err(|e| Error::output(format!("Failed to serialize articles: {e}")))?;
    writer.flush()?;

    info!(
        count = articles.len(),
        path = %path.display(),
        "Articles written"
    );
    Ok(articles.len())
}

/// Write a RecordBatch to a Parquet file, returning the rows written
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()), err)]
pub fn write_parquet(
    path: impl AsRef<Path>,
    batch: &RecordBatch,
    config: Option<&ParquetWriterConfig>,
) -> Result<usize> {
    let path = path.as_ref();
    let default_config = ParquetWriterConfig::default();
    let config = config.unwrap_or(&default_config);

    let file = File::create(path).map_err(|e| {
        Error::output(format!("Failed to create {}: {e}", path.display()))
    })?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(config.build_properties()))?;
    writer.write(batch)?;
    writer.close()?;

    info!(rows = batch.num_rows(), path = %path.display(), "Parquet file written");
    Ok(batch.num_rows())
}
