//! HTTP webhook delivery
//!
//! Sends `{"email": ..., "code": ...}` as JSON to a configured URL. Any
//! transport error or non-success status is a `DeliveryFailure`.

use std::time::Duration;

use async_trait::async_trait;
use cinema_core::{CodeDelivery, DomainError, RepoResult};
use reqwest::Client;
use serde::Serialize;
use tracing::{instrument, warn};

#[derive(Serialize)]
struct ResetCodePayload<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Debug, Clone)]
pub struct WebhookDelivery {
    url: String,
    http_client: Client,
}

impl WebhookDelivery {
    /// `timeout` bounds each request on the client side as well
    pub fn new(url: String, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        Self { url, http_client }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CodeDelivery for WebhookDelivery {
    fn channel(&self) -> &'static str {
        "webhook"
    }

    #[instrument(skip(self, code), fields(url = %self.url))]
    async fn send(&self, email: &str, code: &str) -> RepoResult<()> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&ResetCodePayload { email, code })
            .send()
            .await
            .map_err(|e| DomainError::DeliveryFailure(format!("webhook request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(DomainError::DeliveryFailure(format!(
                "webhook responded with {}",
                response.status()
            )));
        }

        Ok(())
    }
}
