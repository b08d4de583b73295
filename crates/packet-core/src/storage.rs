//! Content-store access.
//!
//! The engine treats blob storage as an opaque byte-range load/store
//! API behind the [`ObjectStore`] trait: download a key from a bucket,
//! upload with overwrite semantics, and compute a public retrieval URL.
//! [`HttpObjectStore`] speaks the Supabase-storage REST shapes the
//! catalog and packet buckets live behind; [`MemoryObjectStore`] backs
//! local development and tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tokio::sync::RwLock;

use crate::config::StorageConfig;
use crate::error::{Error, Result};

/// Byte-blob storage: per-key download, upsert upload, public URL.
///
/// Implementations must provide per-key write atomicity; the engine
/// adds no locking of its own.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes.
    async fn download(&self, bucket: &str, key: &str) -> Result<Bytes>;

    /// Store an object, replacing any previous content under the key.
    async fn upload(&self, bucket: &str, key: &str, bytes: Bytes, content_type: &str)
    -> Result<()>;

    /// Public retrieval URL for a stored object.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Percent-encode a storage key, preserving its `/` separators.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Store client for a Supabase-storage-style REST API.
pub struct HttpObjectStore {
    client: Client,
    base_url: String,
    service_key: Option<String>,
}

impl HttpObjectStore {
    /// Build a store client from configuration.
    pub fn from_config(config: &StorageConfig, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
        })
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket,
            encode_key(key)
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.service_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn download(&self, bucket: &str, key: &str) -> Result<Bytes> {
        // Authenticated object path when a service key is configured,
        // public path otherwise.
        let url = if self.service_key.is_some() {
            self.object_url(bucket, key)
        } else {
            self.public_url(bucket, key)
        };

        let response = self.authorize(self.client.get(&url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Storage(format!(
                "download of {bucket}/{key} failed with status {status}"
            )));
        }

        Ok(response.bytes().await?)
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<()> {
        let url = self.object_url(bucket, key);
        let response = self
            .authorize(self.client.post(&url))
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "upload of {bucket}/{key} failed with status {status}: {detail}"
            )));
        }

        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket,
            encode_key(key)
        )
    }
}

/// In-memory store keyed by (bucket, key). Writes replace whole
/// objects, matching the per-key atomicity the engine assumes.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<(String, String), Bytes>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object count across all buckets.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn download(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| Error::Storage(format!("no object at {bucket}/{key}")))
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        _content_type: &str,
    ) -> Result<()> {
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), key.to_string()), bytes);
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("memory://{}/{}", bucket, encode_key(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn key_encoding_preserves_slashes() {
        assert_eq!(encode_key("packets/My File.pdf"), "packets/My%20File.pdf");
    }

    #[test]
    fn public_url_shape() {
        let store = HttpObjectStore::from_config(
            &StorageConfig {
                base_url: "https://store.example.com/".to_string(),
                ..StorageConfig::default()
            },
            5,
        )
        .unwrap();

        assert_eq!(
            store.public_url("generated-packets", "packets/a.pdf"),
            "https://store.example.com/storage/v1/object/public/generated-packets/packets/a.pdf"
        );
    }

    #[tokio::test]
    async fn memory_store_round_trip_and_upsert() {
        let store = MemoryObjectStore::new();
        store
            .upload("b", "k", Bytes::from_static(b"first"), "application/pdf")
            .await
            .unwrap();
        store
            .upload("b", "k", Bytes::from_static(b"second"), "application/pdf")
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        let bytes = store.download("b", "k").await.unwrap();
        assert_eq!(&bytes[..], b"second");
    }

    #[tokio::test]
    async fn memory_store_missing_key_is_storage_error() {
        let store = MemoryObjectStore::new();
        let err = store.download("b", "nope").await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
