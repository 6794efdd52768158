//! Removal of the processed input object

use tracing::{info, instrument};

use crate::storage::ObjectStore;
use crate::{PipelineError, Result};

/// Delete the input object. Outputs already written are left in place on failure.
#[instrument(skip(store))]
pub async fn remove_input(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<()> {
    store
        .delete_object(bucket, key)
        .await
        .map_err(|e| PipelineError::sink_delete(key, e))?;
    info!("Removed processed input {}/{}", bucket, key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryObjectStore, StoreOp};

    #[tokio::test]
    async fn test_remove_input() {
        let store = MemoryObjectStore::new();
        store.insert("uploads", "cities.txt", "Cairo");

        remove_input(&store, "uploads", "cities.txt").await.unwrap();
        assert!(!store.contains("uploads", "cities.txt"));
    }

    #[tokio::test]
    async fn test_delete_failure_is_sink_delete_error() {
        let store = MemoryObjectStore::new();
        store.insert("uploads", "cities.txt", "Cairo");
        store.fail_on(StoreOp::Delete, "cities.txt", "access denied");

        let err = remove_input(&store, "uploads", "cities.txt").await.unwrap_err();
        assert!(matches!(err, PipelineError::SinkDelete { .. }));
        assert!(store.contains("uploads", "cities.txt"));
    }
}
