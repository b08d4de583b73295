use std::sync::Arc;

use anyhow::Result;
use packet_core::{AppConfig, ObjectStore, PacketBuilder};

/// Global application state.
///
/// One [`PacketBuilder`] serves every request; each build owns its own
/// in-memory document, so no per-request state lives here.
pub struct AppState {
    pub builder: PacketBuilder,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let builder = PacketBuilder::new(config.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create packet builder: {e}"))?;
        Ok(Self { builder, config })
    }

    /// State over an explicit store (tests, local development).
    pub fn with_store(config: AppConfig, store: Arc<dyn ObjectStore>) -> Result<Self> {
        let builder = PacketBuilder::with_store(config.clone(), store)
            .map_err(|e| anyhow::anyhow!("Failed to create packet builder: {e}"))?;
        Ok(Self { builder, config })
    }
}
