//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Used by any handler that supports paginated listing. Values are clamped
/// in the repository layer via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for list endpoints that support an `include_inactive` flag.
///
/// Used by page blocks, where soft-deleted rows are hidden by default.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query parameters for the page listing endpoint.
#[derive(Debug, Deserialize)]
pub struct PageListParams {
    /// Restrict to a single status (`draft`, `published`, `archived`).
    pub status: Option<String>,
    /// Case-insensitive substring match on title or slug.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
