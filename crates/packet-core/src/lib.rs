//! Submittal Packet Core Library
//!
//! This library provides the core functionality for assembling
//! submittal packets:
//! - Document reference resolution (static assets and blob storage)
//! - Cover and divider page synthesis
//! - PDF merging via lopdf
//! - Packet publication to a content store

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod pdf;
pub mod publisher;
pub mod resolver;
pub mod storage;
pub mod util;

pub use catalog::{AVAILABLE_DOCUMENTS, CatalogEntry, PRODUCT_SIZES, normalize_document_refs};
pub use config::{AppConfig, StorageConfig};
pub use error::{Error, Result};
pub use model::{DocumentRef, FormData, PacketRequest, PacketResult};
pub use pdf::{FinalizedPacket, MergedPacket, PacketMeta};
pub use publisher::PacketPublisher;
pub use resolver::DocumentResolver;
pub use storage::{HttpObjectStore, MemoryObjectStore, ObjectStore};
pub use util::{format_bytes, packet_file_name};

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

/// High-level packet builder that combines all components.
///
/// One instance serves any number of builds; each `build` call owns its
/// own [`MergedPacket`], so independent requests can run concurrently
/// with no shared mutable state.
pub struct PacketBuilder {
    resolver: DocumentResolver,
    publisher: PacketPublisher,
}

impl PacketBuilder {
    /// Create a builder backed by the HTTP content store from config.
    pub fn new(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = Arc::new(HttpObjectStore::from_config(
            &config.storage,
            config.fetch_timeout_secs,
        )?);
        Self::with_store(config, store)
    }

    /// Create a builder with an explicit store (tests, local dev).
    pub fn with_store(config: AppConfig, store: Arc<dyn ObjectStore>) -> Result<Self> {
        let resolver = DocumentResolver::new(Arc::clone(&store), &config)?;
        let publisher = PacketPublisher::new(store, &config);
        Ok(Self {
            resolver,
            publisher,
        })
    }

    /// Assemble a packet: cover page, then per document in input order
    /// a divider page followed by every page of its resolved source.
    ///
    /// Pure given its inputs plus the injected store. Per-document
    /// resolve/parse failures are logged and skipped (the divider,
    /// already appended, stays); a document without a storage locator
    /// is skipped before its divider. Only build-wide failures
    /// propagate.
    pub async fn build(
        &self,
        form: &FormData,
        documents: &[DocumentRef],
    ) -> Result<FinalizedPacket> {
        let meta = PacketMeta {
            title: format!("MAXTERRA Submittal - {}", form.project_name),
            author: form.prepared_by.clone(),
            created: Utc::now(),
        };
        let mut packet = MergedPacket::new(meta);

        // Cover lists every requested document, independent of which
        // ones later resolve.
        packet.push_synthesized(pdf::pages::cover_page(form, documents));

        for document in documents {
            let Some(locator) = document.storage_path.as_deref() else {
                warn!("Document {} has no storage path, skipping", document.name);
                continue;
            };

            packet.push_synthesized(pdf::pages::divider_page(
                &document.name,
                document.category_label(),
            ));

            match self.append_document(&mut packet, document, locator).await {
                Ok(pages) => {
                    debug!("Appended {} pages for {}", pages, document.name);
                }
                Err(e) if e.is_per_document() => {
                    warn!("Error processing document {}: {}", document.name, e);
                }
                Err(e) => return Err(e),
            }
        }

        packet.finalize()
    }

    async fn append_document(
        &self,
        packet: &mut MergedPacket,
        document: &DocumentRef,
        locator: &str,
    ) -> Result<usize> {
        let bytes = self.resolver.resolve(&document.name, locator).await?;
        packet.append_source(&document.name, &bytes)
    }

    /// Run one complete build and publish the packet.
    ///
    /// This never returns an error: any fatal build or storage failure
    /// is folded into a `success: false` result, which is the sole
    /// externally observable artifact of a build.
    pub async fn generate(&self, request: &PacketRequest) -> PacketResult {
        let outcome = async {
            let packet = self.build(&request.form_data, &request.documents).await?;
            self.publisher.publish(packet, &request.file_name).await
        }
        .await;

        match outcome {
            Ok(result) => result,
            Err(e) => {
                error!("Error generating packet: {}", e);
                PacketResult::failed(e.to_string())
            }
        }
    }
}
