//! Object storage client.
//!
//! Thin wrapper over the `object_store` crate: S3 in deployments, in-memory
//! backend in tests. Keys are derived as `<prefix>/<id>.txt`.

use std::sync::Arc;

use bytes::Bytes;
use configs::ObjectStoreConfig;
use object_store::{path::Path, ObjectStore, ObjectStoreExt, PutPayload};

use crate::errors::ServiceError;

#[derive(Clone)]
pub struct ObjectClient {
    inner: Arc<dyn ObjectStore>,
    prefix: String,
}

impl ObjectClient {
    /// Build the S3-backed client from config. Returns `None` when object
    /// storage is unconfigured (no bucket): callers treat the capability as
    /// absent rather than erroring.
    pub fn from_config(cfg: &ObjectStoreConfig) -> Result<Option<Self>, ServiceError> {
        let Some(bucket) = &cfg.bucket else {
            return Ok(None);
        };
        let mut builder = object_store::aws::AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(region) = &cfg.region {
            builder = builder.with_region(region);
        }
        let inner = builder
            .build()
            .map_err(|e| ServiceError::Unavailable(format!("failed to create S3 client: {e}")))?;
        Ok(Some(Self { inner: Arc::new(inner), prefix: cfg.prefix.clone() }))
    }

    /// In-memory client for tests.
    pub fn memory(prefix: &str) -> Self {
        Self {
            inner: Arc::new(object_store::memory::InMemory::new()),
            prefix: prefix.to_string(),
        }
    }

    /// Derived object key: namespace prefix + id + extension.
    pub fn key(&self, id: &str) -> Path {
        Path::from(format!("{}/{}.txt", self.prefix, id))
    }

    pub async fn put(&self, id: &str, body: Bytes) -> Result<String, ServiceError> {
        let key = self.key(id);
        self.inner
            .put(&key, PutPayload::from_bytes(body))
            .await
            .map_err(|e| ServiceError::Unavailable(format!("failed to put object: {e}")))?;
        Ok(key.to_string())
    }

    pub async fn get(&self, id: &str) -> Result<Bytes, ServiceError> {
        let key = self.key(id);
        let result = self.inner.get(&key).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => ServiceError::not_found("object"),
            _ => ServiceError::Unavailable(format!("failed to get object: {e}")),
        })?;
        result
            .bytes()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("failed to read object bytes: {e}")))
    }

    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let key = self.key(id);
        self.inner
            .delete(&key)
            .await
            .map_err(|e| ServiceError::Unavailable(format!("failed to delete object: {e}")))
    }

    /// Liveness probe. A missing probe object still proves the bucket is
    /// reachable, so NotFound counts as healthy. Never propagates errors.
    pub async fn probe(&self) -> bool {
        match self.inner.head(&self.key(".probe")).await {
            Ok(_) => true,
            Err(object_store::Error::NotFound { .. }) => true,
            Err(e) => {
                tracing::warn!(store = "s3", error = %e, "object store probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roundtrip_and_delete() {
        let store = ObjectClient::memory("conncheck");

        let content = Bytes::from("demo content");
        let key = store.put("abc", content.clone()).await.unwrap();
        assert_eq!(key, "conncheck/abc.txt");

        let read = store.get("abc").await.unwrap();
        assert_eq!(read, content);

        store.delete("abc").await.unwrap();
        let missing = store.get("abc").await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn probe_healthy_without_probe_object() {
        let store = ObjectClient::memory("conncheck");
        assert!(store.probe().await);
    }

    #[test]
    fn unconfigured_bucket_yields_none() {
        let cfg = ObjectStoreConfig::default();
        assert!(ObjectClient::from_config(&cfg).unwrap().is_none());
    }
}
