//! Request and result types for one packet build.
//!
//! These mirror the JSON wire shapes consumed and produced by the
//! generation endpoint. A build takes one immutable [`FormData`] plus an
//! ordered list of [`DocumentRef`]s and yields exactly one
//! [`PacketResult`]; nothing here is mutated by the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Submittal form payload, rendered onto the cover page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub submitted_to: String,
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_number: Option<String>,
    pub prepared_by: String,
    pub phone_email: String,
    pub date: String,
    /// Status flags keyed by flag name (e.g. `forReview`). Only flags
    /// that are `true` are rendered.
    #[serde(default)]
    pub status: BTreeMap<String, bool>,
    /// Submittal-type flags, same shape as `status`.
    #[serde(default)]
    pub submittal_type: BTreeMap<String, bool>,
    #[serde(default)]
    pub product_size: String,
}

impl FormData {
    /// Status flags that are set, in stable key order.
    pub fn checked_status(&self) -> impl Iterator<Item = &str> {
        self.status
            .iter()
            .filter(|&(_, &checked)| checked)
            .map(|(key, _)| key.as_str())
    }
}

/// Human labels for the well-known status flags. Unknown flags fall
/// back to their raw key.
pub fn status_label(key: &str) -> &str {
    match key {
        "forReview" => "For Review",
        "forRecord" => "For Record",
        "forApproval" => "For Approval",
        "forInformationOnly" => "For Information Only",
        other => other,
    }
}

/// A reference to one source PDF in the catalog.
///
/// This is the single canonical shape: callers normalize whatever loose
/// record they hold into it once, at the boundary. A ref without a
/// `storage_path` cannot contribute pages and is skipped by the merger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl DocumentRef {
    /// Category label for the divider page, defaulting when unset.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Document")
    }
}

/// JSON body of `POST /api/generate-packet`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketRequest {
    pub form_data: FormData,
    pub documents: Vec<DocumentRef>,
    /// Target file name; when empty the server derives one from the
    /// project name and build date.
    #[serde(default)]
    pub file_name: String,
}

/// The sole externally observable artifact of a build.
///
/// Either a complete packet was published (`success: true` with locator
/// and metrics) or the build failed (`success: false` with a message).
/// Per-document skips never flip the flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Human-readable serialized size, e.g. `"1.5 MB"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PacketResult {
    pub fn published(
        download_url: String,
        file_name: String,
        file_size: String,
        page_count: usize,
    ) -> Self {
        Self {
            success: true,
            download_url: Some(download_url),
            file_name: Some(file_name),
            file_size: Some(file_size),
            page_count: Some(page_count),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            download_url: None,
            file_name: None,
            file_size: None,
            page_count: None,
            error: Some(error.into()),
        }
    }
}
