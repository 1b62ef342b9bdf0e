//! HTTP-backed [`PageStore`].
//!
//! Talks to the pulsefit API's document endpoints. Transport failures map
//! to [`StoreError::Unavailable`] so the session can fall back to the
//! static dataset on load.

use std::time::Duration;

use async_trait::async_trait;

use crate::store::{PageDocument, PageStore, StoreError};

/// HTTP request timeout for a single store call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// [`PageStore`] over the HTTP API.
pub struct RemotePageStore {
    client: reqwest::Client,
    base_url: String,
}

impl RemotePageStore {
    /// Build a store for the given API base URL (e.g.
    /// `http://localhost:3000`). Fails only if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());
        Err(match status.as_u16() {
            404 => StoreError::NotFound(message),
            409 => StoreError::Conflict(message),
            400 => StoreError::Validation(message),
            401 | 403 => StoreError::Unauthorized(message),
            502 | 503 | 504 => StoreError::Unavailable(message),
            _ => StoreError::Internal(message),
        })
    }
}

#[async_trait]
impl PageStore for RemotePageStore {
    async fn load(&self, slug_or_id: &str) -> Result<PageDocument, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/pages/{slug_or_id}/document")))
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check(response).await?;
        response
            .json::<PageDocument>()
            .await
            .map_err(|e| StoreError::Internal(format!("decode document: {e}")))
    }

    async fn save(&self, doc: &PageDocument) -> Result<PageDocument, StoreError> {
        let response = self
            .client
            .put(self.url("/pages/document"))
            .json(doc)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check(response).await?;
        response
            .json::<PageDocument>()
            .await
            .map_err(|e| StoreError::Internal(format!("decode document: {e}")))
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_timeout() || err.is_connect() {
        StoreError::Unavailable(err.to_string())
    } else {
        StoreError::Internal(err.to_string())
    }
}
