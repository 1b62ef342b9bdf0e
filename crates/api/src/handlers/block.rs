//! Handlers for page blocks.
//!
//! Blocks are soft-deleted: a DELETE deactivates the row, which disappears
//! from rendering and active listings but stays restorable. Reordering is
//! atomic; a request that does not exactly cover the page's active blocks
//! changes nothing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use pulsefit_core::block::{validate_data, validate_styles, validate_tag};
use pulsefit_core::error::CoreError;
use pulsefit_core::types::DbId;
use pulsefit_db::models::block::{CreateBlock, UpdateBlock};
use pulsefit_db::repositories::{BlockRepo, ReorderError};

use crate::error::{AppError, AppResult};
use crate::handlers::page::resolve_or_404;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for the atomic reorder endpoint.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// The page's active block ids in the desired render order.
    pub block_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Page-scoped handlers (mounted under /pages/{slug_or_id}/blocks)
// ---------------------------------------------------------------------------

/// GET /api/v1/pages/{slug_or_id}/blocks?include_inactive=false
///
/// List a page's blocks in render order.
pub async fn list(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_or_404(&state, &slug_or_id).await?;
    let blocks = BlockRepo::list_for_page(&state.pool, page.id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: blocks }))
}

/// POST /api/v1/pages/{slug_or_id}/blocks
///
/// Create a block. When `sort_order` is omitted the block is appended after
/// the page's current maximum active order.
pub async fn create(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(input): Json<CreateBlock>,
) -> AppResult<impl IntoResponse> {
    validate_tag(&input.kind)?;
    validate_data(&input.data)?;
    validate_styles(input.styles.as_ref())?;

    let page = resolve_or_404(&state, &slug_or_id).await?;
    let block = BlockRepo::create(&state.pool, page.id, &input).await?;
    tracing::info!(block_id = block.id, page_id = page.id, kind = %block.kind, "Block created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: block })))
}

/// PUT /api/v1/pages/{slug_or_id}/blocks/reorder
///
/// Atomically reassign the render order of the page's active blocks. The id
/// sequence must exactly cover the active set; on mismatch nothing changes
/// and the response is 400.
pub async fn reorder(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(body): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_or_404(&state, &slug_or_id).await?;
    let blocks = BlockRepo::reorder(&state.pool, page.id, &body.block_ids)
        .await
        .map_err(|e| match e {
            ReorderError::IdSetMismatch { .. } => AppError::BadRequest(e.to_string()),
            ReorderError::Db(err) => AppError::Database(err),
        })?;
    Ok(Json(DataResponse { data: blocks }))
}

// ---------------------------------------------------------------------------
// Block-id handlers (mounted under /blocks)
// ---------------------------------------------------------------------------

/// GET /api/v1/blocks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let block = BlockRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Block",
            id,
        }))?;
    Ok(Json(DataResponse { data: block }))
}

/// PUT /api/v1/blocks/{id}
///
/// Partial update of kind, order, data, or styles.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBlock>,
) -> AppResult<impl IntoResponse> {
    if let Some(kind) = &input.kind {
        validate_tag(kind)?;
    }
    if let Some(data) = &input.data {
        validate_data(data)?;
    }
    validate_styles(input.styles.as_ref())?;

    let block = BlockRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Block",
            id,
        }))?;
    Ok(Json(DataResponse { data: block }))
}

/// DELETE /api/v1/blocks/{id}
///
/// Soft-delete a block. Deleting an already-inactive block is a no-op.
pub async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    // Distinguish "gone" from "already inactive": both return false from
    // the repository, only the former is a 404.
    let exists = BlockRepo::find_by_id(&state.pool, id).await?.is_some();
    if !exists {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Block",
            id,
        }));
    }
    BlockRepo::soft_delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/blocks/{id}/restore
///
/// Reactivate a soft-deleted block at its previous position.
pub async fn restore(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let exists = BlockRepo::find_by_id(&state.pool, id).await?.is_some();
    if !exists {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Block",
            id,
        }));
    }
    BlockRepo::restore(&state.pool, id).await?;
    let block = BlockRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Block",
            id,
        }))?;
    Ok(Json(DataResponse { data: block }))
}
