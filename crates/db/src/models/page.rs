//! Page entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pulsefit_core::types::{DbId, Timestamp};

/// A page row from the `pages` table.
///
/// `status` and `template` are stored as TEXT; use
/// [`pulsefit_core::page::PageStatus::parse`] /
/// [`pulsefit_core::page::PageTemplate::parse`] when the enum is needed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub status: String,
    pub template: String,
    /// Incremented on every persisted update. Monotonic; clients can use it
    /// to detect (not prevent) concurrent overwrites.
    pub version_number: i64,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
    /// Defaults to `default` if omitted.
    pub template: Option<String>,
    pub created_by: Option<String>,
}

/// DTO for updating an existing page. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePage {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub status: Option<String>,
    pub template: Option<String>,
    pub updated_by: Option<String>,
}

/// Filter for paginated page listings.
#[derive(Debug, Clone, Default)]
pub struct PageFilter {
    /// Restrict to a single status.
    pub status: Option<String>,
    /// Case-insensitive substring match on title or slug.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
