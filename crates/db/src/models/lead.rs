//! Lead entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pulsefit_core::types::{DbId, Timestamp};

/// Lead kinds accepted by the capture forms.
pub const LEAD_KINDS: &[&str] = &["consultation", "trainer", "corporate"];

/// Lead pipeline statuses.
pub const LEAD_STATUSES: &[&str] = &["new", "contacted", "closed"];

/// A lead row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub kind: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    /// Slug of the page the form was submitted from.
    pub source_page: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new lead.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLead {
    pub kind: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub source_page: Option<String>,
}
