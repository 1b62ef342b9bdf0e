//! Lead capture webhook delivery.
//!
//! Posts each captured lead to the configured URL. Delivery is best-effort
//! with bounded retries; a dead endpoint never blocks or fails the capture
//! request itself.

use std::time::Duration;

use serde_json::json;

use pulsefit_db::models::lead::Lead;

/// Maximum delivery attempts per lead.
const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff: 1s, 2s, 4s.
const BASE_BACKOFF: Duration = Duration::from_secs(1);

/// HTTP timeout for a single delivery attempt.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook client for lead notifications.
pub struct LeadWebhook {
    client: reqwest::Client,
    url: String,
}

impl LeadWebhook {
    pub fn new(url: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()?;
        Ok(Self { client, url })
    }

    /// Deliver a lead notification, retrying with exponential backoff.
    ///
    /// Logs and gives up after [`MAX_ATTEMPTS`]; the lead row is already
    /// persisted, so a failed delivery loses nothing.
    pub async fn notify(&self, lead: &Lead) {
        let payload = json!({
            "event": "lead.created",
            "lead": lead,
        });

        for attempt in 1..=MAX_ATTEMPTS {
            match self.client.post(&self.url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::info!(lead_id = lead.id, attempt, "Lead webhook delivered");
                    return;
                }
                Ok(response) => {
                    tracing::warn!(
                        lead_id = lead.id,
                        attempt,
                        status = %response.status(),
                        "Lead webhook returned non-success status"
                    );
                }
                Err(e) => {
                    tracing::warn!(lead_id = lead.id, attempt, error = %e, "Lead webhook delivery failed");
                }
            }

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(BASE_BACKOFF * 2u32.pow(attempt - 1)).await;
            }
        }

        tracing::error!(
            lead_id = lead.id,
            url = %self.url,
            "Lead webhook delivery abandoned after {MAX_ATTEMPTS} attempts"
        );
    }
}
