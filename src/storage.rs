//! Object storage abstraction for source and destination buckets.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sdk error: {0}")]
    Sdk(String),
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    fn from_sdk(err: impl fmt::Display) -> Self {
        Self::Sdk(err.to_string())
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError>;
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError>;
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError>;
}

/// S3-backed store; region and credentials come from the default provider chain.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub async fn from_env() -> Self {
        let shared_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            client: Client::new(&shared_config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err {
                SdkError::ServiceError(service_err) => {
                    if service_err.err().is_no_such_key() {
                        StoreError::NotFound {
                            bucket: bucket.to_string(),
                            key: key.to_string(),
                        }
                    } else {
                        StoreError::from_sdk(service_err.err())
                    }
                }
                other => StoreError::from_sdk(other),
            })?;

        let data = output.body.collect().await.map_err(StoreError::from_sdk)?;
        Ok(data.into_bytes())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(StoreError::from_sdk)?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(StoreError::from_sdk)?;
        Ok(())
    }
}

/// Stored object with its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Operation kinds a [`MemoryObjectStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    Put,
    Delete,
}

/// In-process store for local runs and tests.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    failures: Mutex<HashMap<(StoreOp, String), String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without going through the trait
    pub fn insert(&self, bucket: &str, key: &str, bytes: impl Into<Bytes>) {
        self.lock_objects().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes: bytes.into(),
                content_type: "text/plain".to_string(),
            },
        );
    }

    /// Make every `op` against `key` fail with `message`
    pub fn fail_on(&self, op: StoreOp, key: &str, message: &str) {
        self.lock_failures()
            .insert((op, key.to_string()), message.to_string());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.lock_objects()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.object(bucket, key).is_some()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock_objects()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    fn check(&self, op: StoreOp, key: &str) -> Result<(), StoreError> {
        match self.lock_failures().get(&(op, key.to_string())) {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), StoredObject>> {
        self.objects.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_failures(&self) -> std::sync::MutexGuard<'_, HashMap<(StoreOp, String), String>> {
        self.failures.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.check(StoreOp::Get, key)?;
        self.object(bucket, key)
            .map(|object| object.bytes)
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.check(StoreOp::Put, key)?;
        self.lock_objects().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.check(StoreOp::Delete, key)?;
        // S3 deletes are idempotent; a missing key is not an error.
        self.lock_objects()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
