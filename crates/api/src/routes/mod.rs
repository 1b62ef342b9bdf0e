pub mod block;
pub mod health;
pub mod lead;
pub mod page;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pages                                  list, create
/// /pages/document                         save full document (PUT)
/// /pages/{slug_or_id}                     get, update, archive
/// /pages/{slug_or_id}/rendered            rendered public page (GET)
/// /pages/{slug_or_id}/document            full editable document (GET)
/// /pages/{slug_or_id}/blocks              list, create
/// /pages/{slug_or_id}/blocks/reorder      atomic reorder (PUT)
///
/// /blocks/{id}                            get, update, soft-delete
/// /blocks/{id}/restore                    restore soft-deleted block (POST)
///
/// /leads                                  list, create
/// /leads/{id}                             get
/// /leads/{id}/status                      update pipeline status (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/pages", page::router())
        .nest("/blocks", block::router())
        .nest("/leads", lead::router())
}
