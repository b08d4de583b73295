//! Document reference resolution.
//!
//! Turns a storage locator into raw PDF bytes via one of two retrieval
//! strategies: locators under the `/documents/` prefix are public
//! static assets fetched over HTTP at the store's base URL; anything
//! else is a key into the source-document bucket. No caching and no
//! retry — a resolution failure is final for that document in that
//! build, and every failure maps to [`Error::Resolve`] carrying the
//! document name so the merge loop can log the skip.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::storage::ObjectStore;

/// Locator prefix marking a public static asset.
const STATIC_ASSET_PREFIX: &str = "/documents/";

/// Whether a locator addresses a static asset rather than a bucket key.
pub fn is_static_asset(locator: &str) -> bool {
    locator.starts_with(STATIC_ASSET_PREFIX)
}

/// Resolves document locators to raw bytes.
pub struct DocumentResolver {
    store: Arc<dyn ObjectStore>,
    client: Client,
    assets_base_url: String,
    source_bucket: String,
}

impl DocumentResolver {
    pub fn new(store: Arc<dyn ObjectStore>, config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;

        Ok(Self {
            store,
            client,
            assets_base_url: config.storage.base_url.trim_end_matches('/').to_string(),
            source_bucket: config.storage.source_bucket.clone(),
        })
    }

    /// Resolve a locator to bytes; `name` travels with any failure.
    pub async fn resolve(&self, name: &str, locator: &str) -> Result<Bytes> {
        let bytes = if is_static_asset(locator) {
            self.fetch_static_asset(name, locator).await?
        } else {
            self.store
                .download(&self.source_bucket, locator)
                .await
                .map_err(|e| Error::Resolve {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?
        };

        debug!("Resolved '{}' ({} bytes) from {}", name, bytes.len(), locator);
        Ok(bytes)
    }

    async fn fetch_static_asset(&self, name: &str, locator: &str) -> Result<Bytes> {
        let url = format!("{}{}", self.assets_base_url, locator);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Resolve {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Resolve {
                name: name.to_string(),
                reason: format!("static asset fetch returned status {status}"),
            });
        }

        response.bytes().await.map_err(|e| Error::Resolve {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}
