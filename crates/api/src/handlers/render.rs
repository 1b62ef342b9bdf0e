//! Public page rendering.
//!
//! Projects a page's active blocks through the block registry into HTML
//! fragments. Only published pages are visible here; drafts return 404 just
//! like missing pages. When the database has no row for the slug, or cannot
//! be reached at all, the static fallback dataset is consulted, so the stock
//! marketing pages keep serving even on an empty or unreachable CMS.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use pulsefit_core::page::PageStatus;
use pulsefit_core::render::{BlockView, RenderMode, RenderedBlock};
use pulsefit_db::repositories::{BlockRepo, PageRepo};
use pulsefit_editor::fallback;
use pulsefit_editor::StoreError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the rendering endpoint.
#[derive(Debug, Deserialize)]
pub struct RenderParams {
    /// `public` (default) or `edit`. Edit mode wraps each fragment with the
    /// editor's block chrome.
    pub mode: Option<String>,
}

/// A fully rendered page.
#[derive(Debug, Serialize)]
pub struct RenderedPage {
    pub slug: String,
    pub title: String,
    pub template: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub blocks: Vec<RenderedBlock>,
}

fn parse_mode(params: &RenderParams) -> AppResult<RenderMode> {
    match params.mode.as_deref() {
        None | Some("public") => Ok(RenderMode::Public),
        Some("edit") => Ok(RenderMode::Edit),
        Some(other) => Err(AppError::BadRequest(format!(
            "Unknown render mode '{other}'; expected 'public' or 'edit'"
        ))),
    }
}

/// True for errors that mean the database itself is unreachable, as opposed
/// to a query-level failure.
fn is_connectivity_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)
    )
}

/// GET /api/v1/pages/{slug_or_id}/rendered?mode=public
pub async fn rendered_page(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Query(params): Query<RenderParams>,
) -> AppResult<impl IntoResponse> {
    let mode = parse_mode(&params)?;

    let page = match PageRepo::resolve(&state.pool, &slug_or_id).await {
        Ok(found) => found,
        Err(err) if is_connectivity_error(&err) => {
            // The stock pages keep serving through an outage; anything not
            // in the fallback dataset reports the outage instead.
            tracing::warn!(error = %err, "Database unreachable, trying fallback dataset");
            return match render_fallback(&state, &slug_or_id, mode) {
                Some(rendered) => Ok(Json(DataResponse { data: rendered })),
                None => Err(AppError::Store(StoreError::Unavailable(err.to_string()))),
            };
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(page) = page {
        if page.status != PageStatus::Published.as_str() {
            return Err(AppError::Store(StoreError::NotFound(format!(
                "page '{slug_or_id}'"
            ))));
        }
        let blocks = BlockRepo::list_for_page(&state.pool, page.id, false).await?;
        let views: Vec<BlockView> = blocks.iter().map(|b| b.to_view()).collect();
        let rendered = RenderedPage {
            slug: page.slug,
            title: page.title,
            template: page.template,
            meta_title: page.meta_title,
            meta_description: page.meta_description,
            meta_keywords: page.meta_keywords,
            blocks: state.registry.render_page(&views, mode),
        };
        return Ok(Json(DataResponse { data: rendered }));
    }

    // No stored page; serve the stock content if the slug matches it.
    let rendered = render_fallback(&state, &slug_or_id, mode).ok_or_else(|| {
        AppError::Store(StoreError::NotFound(format!("page '{slug_or_id}'")))
    })?;
    Ok(Json(DataResponse { data: rendered }))
}

fn render_fallback(state: &AppState, slug_or_id: &str, mode: RenderMode) -> Option<RenderedPage> {
    let doc = fallback::find(slug_or_id)?;
    let views: Vec<BlockView> = doc.active_blocks().map(|b| b.to_view()).collect();
    Some(RenderedPage {
        slug: doc.slug,
        title: doc.title,
        template: doc.template.as_str().to_string(),
        meta_title: doc.meta_title,
        meta_description: doc.meta_description,
        meta_keywords: doc.meta_keywords,
        blocks: state.registry.render_page(&views, mode),
    })
}
