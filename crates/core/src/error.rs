//! Domain-level error type shared across crates.

use crate::types::DbId;

/// Errors produced by domain logic and surfaced through every layer.
///
/// The HTTP layer maps each variant to a status code and stable error code;
/// the repository layer produces them for lookups and constraint failures.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by ID found nothing.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity type name, e.g. `"Page"`.
        entity: &'static str,
        id: DbId,
    },

    /// Input failed a domain validation rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation conflicts with existing state (e.g. duplicate slug).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
