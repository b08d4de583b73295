//! HTTP route handlers.
//!
//! All routes speak JSON. Generation mirrors the packet contract: a
//! completed build answers 200 with the success payload; any fatal
//! build or storage failure answers 500 with `{ success: false,
//! error }`. Per-document skips happen inside the engine and never
//! change the status code.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::info;

use packet_core::{
    AVAILABLE_DOCUMENTS, CatalogEntry, PRODUCT_SIZES, PacketRequest, PacketResult,
    normalize_document_refs, packet_file_name,
};

use crate::state::AppState;

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// The fixed document catalog, in display order.
pub async fn list_documents() -> Json<&'static [CatalogEntry]> {
    Json(AVAILABLE_DOCUMENTS)
}

/// Product sizes offered on the submittal form.
pub async fn list_product_sizes() -> Json<&'static [&'static str]> {
    Json(PRODUCT_SIZES)
}

/// Build and publish one packet.
pub async fn generate_packet(
    State(state): State<Arc<AppState>>,
    Json(mut request): Json<PacketRequest>,
) -> (StatusCode, Json<PacketResult>) {
    normalize_document_refs(&mut request.documents);
    if request.file_name.is_empty() {
        request.file_name =
            packet_file_name(&request.form_data.project_name, Utc::now().date_naive());
    }

    info!(
        "Generating packet '{}' with {} documents",
        request.file_name,
        request.documents.len()
    );

    let result = state.builder.generate(&request).await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(result))
}
