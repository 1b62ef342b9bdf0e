use std::sync::Arc;

use pulsefit_core::render::BlockRegistry;

use crate::config::ServerConfig;
use crate::notify::LeadWebhook;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pulsefit_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Registry of block renderers for the public rendering endpoint.
    pub registry: Arc<BlockRegistry>,
    /// Lead notification webhook, when configured.
    pub webhook: Option<Arc<LeadWebhook>>,
}
