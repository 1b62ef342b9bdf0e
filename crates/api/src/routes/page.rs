//! Route definitions for pages and their block collections.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{block, document, page, render};
use crate::state::AppState;

/// Routes mounted at `/pages`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// PUT    /document                      -> document::save
/// GET    /{slug_or_id}                  -> get_one
/// PUT    /{slug_or_id}                  -> update
/// DELETE /{slug_or_id}                  -> archive
/// GET    /{slug_or_id}/rendered         -> render::rendered_page
/// GET    /{slug_or_id}/document         -> document::get_document
/// GET    /{slug_or_id}/blocks           -> block::list
/// POST   /{slug_or_id}/blocks           -> block::create
/// PUT    /{slug_or_id}/blocks/reorder   -> block::reorder
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(page::list).post(page::create))
        // Static segment; must not collide with the {slug_or_id} capture.
        .route("/document", put(document::save))
        .route(
            "/{slug_or_id}",
            get(page::get_one).put(page::update).delete(page::archive),
        )
        .route("/{slug_or_id}/rendered", get(render::rendered_page))
        .route("/{slug_or_id}/document", get(document::get_document))
        .route("/{slug_or_id}/blocks", get(block::list).post(block::create))
        .route("/{slug_or_id}/blocks/reorder", put(block::reorder))
}
