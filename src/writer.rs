//! CSV serialization and upload of ranked result sets

use bytes::Bytes;
use tracing::{info, instrument};

use crate::models::ResultSet;
use crate::storage::ObjectStore;
use crate::{PipelineError, Result};

pub const CSV_CONTENT_TYPE: &str = "text/csv";

// -0.0 + 0.0 is 0.0, so negative zero renders as "0".
fn format_value(value: f64) -> String {
    (value + 0.0).to_string()
}

/// Encode `results` as CSV: a `City,<metric>` header then one row per entry.
pub fn to_csv(results: &ResultSet, key: &str) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["City", results.metric.column_header()])
        .map_err(|e| PipelineError::serialization(key, e))?;
    for entry in &results.entries {
        writer
            .write_record([entry.city.as_str(), format_value(entry.value).as_str()])
            .map_err(|e| PipelineError::serialization(key, e))?;
    }

    writer
        .into_inner()
        .map_err(|e| PipelineError::serialization(key, e))
}

/// Serialize `results` and store it under `key`, replacing any existing object.
#[instrument(skip(store, results), fields(metric = ?results.metric, rows = results.len()))]
pub async fn write_results(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    results: &ResultSet,
) -> Result<()> {
    let body = to_csv(results, key)?;
    let size = body.len();

    store
        .put_object(bucket, key, Bytes::from(body), CSV_CONTENT_TYPE)
        .await
        .map_err(|e| PipelineError::sink_write(key, e))?;

    info!("Wrote {} bytes to {}/{}", size, bucket, key);
    Ok(())
}
