use serde::{Deserialize, Serialize};

/// Content-store configuration.
///
/// The store speaks a Supabase-storage-style REST API: objects live in
/// buckets, public objects are fetched under
/// `{base_url}/storage/v1/object/public/{bucket}/{key}`, and static
/// assets are served directly under `{base_url}{path}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the content store (no trailing slash).
    pub base_url: String,

    /// Service key sent as a bearer token on writes. Public reads work
    /// without it.
    #[serde(default)]
    pub service_key: Option<String>,

    /// Bucket holding catalog source PDFs.
    #[serde(default = "default_source_bucket")]
    pub source_bucket: String,

    /// Bucket receiving generated packets.
    #[serde(default = "default_packet_bucket")]
    pub packet_bucket: String,

    /// Key prefix for generated packets within the packet bucket.
    #[serde(default = "default_packet_prefix")]
    pub packet_prefix: String,
}

fn default_source_bucket() -> String {
    "source-documents".to_string()
}

fn default_packet_bucket() -> String {
    "generated-packets".to_string()
}

fn default_packet_prefix() -> String {
    "packets".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            service_key: None,
            source_bucket: default_source_bucket(),
            packet_bucket: default_packet_bucket(),
            packet_prefix: default_packet_prefix(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content-store settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP timeout for document fetches, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

const fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}")))
    }

    /// Load `./config.toml` when present, defaults otherwise.
    ///
    /// Anything beyond the working directory goes through an explicit
    /// path (`--config` / `PACKET_CONFIG`) instead of a search list.
    pub fn load() -> Self {
        let local_config = std::path::Path::new("config.toml");
        if local_config.exists() {
            match Self::from_file(local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}
