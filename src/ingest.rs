//! City list ingestion
//!
//! Reads the uploaded object and turns its comma-separated contents into an
//! ordered list of city names.

use tracing::{debug, info, instrument};

use crate::storage::{ObjectStore, StoreError};
use crate::{PipelineError, Result};

const DELIMITER: char = ',';

/// Parse comma-separated city names.
///
/// All whitespace inside a field is removed, a trailing fragment without a
/// delimiter is the last city, and fields left empty are skipped.
#[must_use]
pub fn parse_cities(text: &str) -> Vec<String> {
    text.split(DELIMITER)
        .map(|field| field.split_whitespace().collect::<String>())
        .filter(|city| !city.is_empty())
        .collect()
}

/// Fetch `key` from `bucket` and parse its city list.
///
/// An object that does not exist yields a `SourceRead` error flagged as
/// missing, so callers can tell a consumed upload from an unreadable one.
#[instrument(skip(store))]
pub async fn read_cities(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<Vec<String>> {
    let bytes = store.get_object(bucket, key).await.map_err(|e| match e {
        StoreError::NotFound { .. } => PipelineError::source_missing(key, e),
        other => PipelineError::source_read(key, other),
    })?;
    debug!("Read {} bytes from {}/{}", bytes.len(), bucket, key);

    let text = std::str::from_utf8(&bytes)
        .map_err(|e| PipelineError::source_read(key, format!("not valid UTF-8: {e}")))?;

    let cities = parse_cities(text);
    info!(count = cities.len(), "Parsed city list");
    Ok(cities)
}
