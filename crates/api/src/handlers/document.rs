//! Bulk document endpoints backing the editor.
//!
//! The editor loads and saves a page with its full block set in one request;
//! the server-side page store performs the block diffing and the atomic
//! order normalization. Concurrency is last-write-wins.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use pulsefit_editor::pg::PgPageStore;
use pulsefit_editor::{PageDocument, PageStore};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/pages/{slug_or_id}/document
///
/// The full editable document: page fields plus every block, active and
/// inactive, in render order.
pub async fn get_document(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let store = PgPageStore::new(state.pool.clone());
    let doc = store.load(&slug_or_id).await?;
    Ok(Json(DataResponse { data: doc }))
}

/// PUT /api/v1/pages/document
///
/// Persist a full document. Creates the page when `id` is null, otherwise
/// updates it; blocks are created, updated, soft-deleted, and reordered to
/// match the submitted state. Returns the canonical stored copy.
pub async fn save(
    State(state): State<AppState>,
    Json(doc): Json<PageDocument>,
) -> AppResult<impl IntoResponse> {
    let store = PgPageStore::new(state.pool.clone());
    let saved = store.save(&doc).await?;
    tracing::info!(
        page_id = ?saved.id,
        slug = %saved.slug,
        version = saved.version_number,
        "Document saved"
    );
    Ok(Json(DataResponse { data: saved }))
}
