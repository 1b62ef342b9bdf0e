//! Handlers for the `/pages` resource.
//!
//! Pages are addressed by numeric id or slug interchangeably; archiving is a
//! soft operation that frees the slug for reuse.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use pulsefit_core::error::CoreError;
use pulsefit_core::page::{self, PageStatus, PageTemplate};
use pulsefit_editor::StoreError;
use pulsefit_db::models::page::{CreatePage, Page, PageFilter, UpdatePage};
use pulsefit_db::repositories::PageRepo;

use crate::error::{AppError, AppResult};
use crate::query::PageListParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// Resolve a page by slug or numeric id, or fail with 404.
pub async fn resolve_or_404(state: &AppState, slug_or_id: &str) -> AppResult<Page> {
    PageRepo::resolve(&state.pool, slug_or_id)
        .await?
        .ok_or_else(|| {
            AppError::Store(StoreError::NotFound(format!("page '{slug_or_id}'")))
        })
}

fn validate_page_fields(
    slug: Option<&str>,
    title: Option<&str>,
    meta_title: Option<&str>,
    meta_description: Option<&str>,
    meta_keywords: Option<&str>,
    status: Option<&str>,
    template: Option<&str>,
) -> AppResult<()> {
    if let Some(slug) = slug {
        page::validate_slug(slug)?;
    }
    if let Some(title) = title {
        page::validate_title(title)?;
    }
    if let Some(v) = meta_title {
        page::validate_meta_field("meta_title", v)?;
    }
    if let Some(v) = meta_description {
        page::validate_meta_field("meta_description", v)?;
    }
    if let Some(v) = meta_keywords {
        page::validate_meta_field("meta_keywords", v)?;
    }
    if let Some(status) = status {
        PageStatus::parse(status)?;
    }
    if let Some(template) = template {
        PageTemplate::parse(template)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/pages?status=&search=&limit=&offset=
///
/// List pages newest-edited first with the total matching count.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        PageStatus::parse(status)?;
    }
    let filter = PageFilter {
        status: params.status,
        search: params.search,
        limit: params.limit,
        offset: params.offset,
    };
    let (pages, total) = PageRepo::list(&state.pool, &filter).await?;
    Ok(Json(ListResponse { data: pages, total }))
}

/// POST /api/v1/pages
///
/// Create a new page. Status defaults to `draft`, template to `default`.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    validate_page_fields(
        Some(&input.slug),
        Some(&input.title),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
        input.meta_keywords.as_deref(),
        input.status.as_deref(),
        input.template.as_deref(),
    )?;

    let created = PageRepo::create(&state.pool, &input).await?;
    tracing::info!(page_id = created.id, slug = %created.slug, "Page created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/pages/{slug_or_id}
pub async fn get_one(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page = resolve_or_404(&state, &slug_or_id).await?;
    Ok(Json(DataResponse { data: page }))
}

/// PUT /api/v1/pages/{slug_or_id}
///
/// Partial update; omitted fields keep their stored values. Every
/// successful update bumps `version_number`.
pub async fn update(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(input): Json<UpdatePage>,
) -> AppResult<impl IntoResponse> {
    validate_page_fields(
        input.slug.as_deref(),
        input.title.as_deref(),
        input.meta_title.as_deref(),
        input.meta_description.as_deref(),
        input.meta_keywords.as_deref(),
        input.status.as_deref(),
        input.template.as_deref(),
    )?;

    let page = resolve_or_404(&state, &slug_or_id).await?;
    let updated = PageRepo::update(&state.pool, page.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Page",
            id: page.id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/pages/{slug_or_id}
///
/// Archive a page (soft operation; the slug becomes reusable).
pub async fn archive(
    State(state): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> AppResult<StatusCode> {
    let page = resolve_or_404(&state, &slug_or_id).await?;
    let archived = PageRepo::archive(&state.pool, page.id).await?;
    if archived {
        tracing::info!(page_id = page.id, slug = %page.slug, "Page archived");
    }
    // Already-archived pages archive idempotently.
    Ok(StatusCode::NO_CONTENT)
}
