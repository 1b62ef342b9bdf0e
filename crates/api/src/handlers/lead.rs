//! Handlers for the `/leads` resource.
//!
//! `create` is the public capture endpoint behind the site's forms; the
//! rest are management endpoints for working the pipeline.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use pulsefit_core::error::CoreError;
use pulsefit_core::types::DbId;
use pulsefit_db::models::lead::{CreateLead, LEAD_KINDS, LEAD_STATUSES};
use pulsefit_db::repositories::LeadRepo;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// Request body for the status update endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

fn validate_lead(input: &CreateLead) -> AppResult<()> {
    if !LEAD_KINDS.contains(&input.kind.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown lead kind '{}'; expected one of {:?}",
            input.kind, LEAD_KINDS
        ))));
    }
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    let email = input.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "a valid email address is required".into(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/leads
///
/// Capture a lead from a site form. Webhook notification is fire-and-forget
/// so a slow or failing webhook never delays the visitor's response.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateLead>,
) -> AppResult<impl IntoResponse> {
    validate_lead(&input)?;

    let lead = LeadRepo::create(&state.pool, &input).await?;
    tracing::info!(lead_id = lead.id, kind = %lead.kind, "Lead captured");

    if let Some(webhook) = &state.webhook {
        let webhook = webhook.clone();
        let lead_for_hook = lead.clone();
        tokio::spawn(async move {
            webhook.notify(&lead_for_hook).await;
        });
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: lead })))
}

/// GET /api/v1/leads?limit=&offset=
///
/// List leads newest first with the total count.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (leads, total) = LeadRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(ListResponse { data: leads, total }))
}

/// GET /api/v1/leads/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;
    Ok(Json(DataResponse { data: lead }))
}

/// PUT /api/v1/leads/{id}/status
///
/// Move a lead through the pipeline (`new` -> `contacted` -> `closed`).
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    if !LEAD_STATUSES.contains(&body.status.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown lead status '{}'; expected one of {:?}",
            body.status, LEAD_STATUSES
        ))));
    }

    let lead = LeadRepo::update_status(&state.pool, id, &body.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;
    Ok(Json(DataResponse { data: lead }))
}
