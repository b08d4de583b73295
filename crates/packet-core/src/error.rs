use thiserror::Error;

/// Unified error type for packet-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Document resolution (static-asset fetch, blob-store download)
/// - Source PDF parsing and page copying
/// - Packet serialization and storage upload
/// - Configuration loading
/// - General I/O operations
///
/// Resolution and parse errors are scoped to a single document and are
/// recovered inside the merge loop; every other variant is fatal to the
/// whole build.
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Per-document errors (recovered by the merger)
    // ==========================================================================
    /// Source bytes for a document could not be obtained
    #[error("failed to resolve document '{name}': {reason}")]
    Resolve { name: String, reason: String },

    /// Source bytes were obtained but are not a parseable PDF
    #[error("failed to parse document '{name}': {reason}")]
    Parse { name: String, reason: String },

    // ==========================================================================
    // Fatal build errors
    // ==========================================================================
    /// Failed to serialize the merged packet
    #[error("failed to save packet: {0}")]
    PdfSave(String),

    /// Error from the lopdf library outside a per-document scope
    #[error("lopdf error: {0}")]
    Lopdf(String),

    /// Storage upload or download failed outside a per-document scope
    #[error("storage error: {0}")]
    Storage(String),

    /// HTTP transport failure talking to the content store
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is scoped to a single document.
    ///
    /// Per-document errors are logged and skipped by the merger; anything
    /// else aborts the build.
    pub const fn is_per_document(&self) -> bool {
        matches!(self, Self::Resolve { .. } | Self::Parse { .. })
    }

    /// The document name carried by a per-document error, if any.
    pub fn document_name(&self) -> Option<&str> {
        match self {
            Self::Resolve { name, .. } | Self::Parse { name, .. } => Some(name),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
