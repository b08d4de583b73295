//! Packet serialization and publication.
//!
//! The publisher owns the last leg of a build: serialize the finalized
//! document exactly once, persist it under a deterministic key in the
//! packet bucket with overwrite semantics, and report the public URL
//! plus summary metrics. A storage failure here fails the whole build;
//! nothing is ever partially published.

use std::sync::Arc;

use bytes::Bytes;
use tracing::info;

use crate::config::AppConfig;
use crate::error::Result;
use crate::model::PacketResult;
use crate::pdf::FinalizedPacket;
use crate::storage::ObjectStore;
use crate::util::format_bytes;

pub struct PacketPublisher {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    prefix: String,
}

impl PacketPublisher {
    pub fn new(store: Arc<dyn ObjectStore>, config: &AppConfig) -> Self {
        Self {
            store,
            bucket: config.storage.packet_bucket.clone(),
            prefix: config.storage.packet_prefix.clone(),
        }
    }

    /// Storage key for a packet file name. Deterministic: republishing
    /// the same file name always hits the same key.
    pub fn storage_key(&self, file_name: &str) -> String {
        format!("{}/{}", self.prefix, file_name)
    }

    /// Serialize and store a finalized packet, returning the success
    /// result with locator and metrics.
    pub async fn publish(
        &self,
        mut packet: FinalizedPacket,
        file_name: &str,
    ) -> Result<PacketResult> {
        let bytes = packet.to_bytes()?;
        let byte_count = bytes.len() as u64;
        let key = self.storage_key(file_name);

        self.store
            .upload(&self.bucket, &key, Bytes::from(bytes), "application/pdf")
            .await?;

        let download_url = self.store.public_url(&self.bucket, &key);
        info!(
            "Published packet {} ({} pages, {})",
            key,
            packet.page_count(),
            format_bytes(byte_count)
        );

        Ok(PacketResult::published(
            download_url,
            file_name.to_string(),
            format_bytes(byte_count),
            packet.page_count(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::Utc;

    use crate::pdf::{MergedPacket, PacketMeta, PageCanvas};
    use crate::storage::MemoryObjectStore;

    fn finalized_packet() -> FinalizedPacket {
        let mut packet = MergedPacket::new(PacketMeta {
            title: "MAXTERRA Submittal - Test".to_string(),
            author: "Tester".to_string(),
            created: Utc::now(),
        });
        packet.push_synthesized(PageCanvas::new());
        packet.finalize().unwrap()
    }

    #[tokio::test]
    async fn publish_stores_under_packets_prefix() {
        let store = Arc::new(MemoryObjectStore::new());
        let publisher = PacketPublisher::new(Arc::clone(&store) as Arc<dyn ObjectStore>, &AppConfig::default());

        let result = publisher
            .publish(finalized_packet(), "MAXTERRA_Test_2025-06-01.pdf")
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.page_count, Some(1));
        assert_eq!(
            result.file_name.as_deref(),
            Some("MAXTERRA_Test_2025-06-01.pdf")
        );
        assert!(result.file_size.is_some());
        assert!(
            result
                .download_url
                .as_deref()
                .unwrap()
                .ends_with("generated-packets/packets/MAXTERRA_Test_2025-06-01.pdf")
        );

        let stored = store
            .download("generated-packets", "packets/MAXTERRA_Test_2025-06-01.pdf")
            .await
            .unwrap();
        assert!(stored.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn republish_same_name_replaces_content_at_same_key() {
        let store = Arc::new(MemoryObjectStore::new());
        let publisher = PacketPublisher::new(Arc::clone(&store) as Arc<dyn ObjectStore>, &AppConfig::default());

        let first = publisher.publish(finalized_packet(), "same.pdf").await.unwrap();
        let second = publisher.publish(finalized_packet(), "same.pdf").await.unwrap();

        assert_eq!(first.download_url, second.download_url);
        assert_eq!(store.len().await, 1);
    }
}
