//! Route definitions for individual blocks.
//!
//! Page-scoped block routes (list, create, reorder) live under `/pages`;
//! see [`crate::routes::page`].

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::block;
use crate::state::AppState;

/// Routes mounted at `/blocks`.
///
/// ```text
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> soft_delete
/// POST   /{id}/restore  -> restore
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(block::get_by_id)
                .put(block::update)
                .delete(block::soft_delete),
        )
        .route("/{id}/restore", post(block::restore))
}
