//! Route definitions for captured leads.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::lead;
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// GET  /              -> list
/// POST /              -> create (public capture endpoint)
/// GET  /{id}          -> get_by_id
/// PUT  /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lead::list).post(lead::create))
        .route("/{id}", get(lead::get_by_id))
        .route("/{id}/status", put(lead::update_status))
}
