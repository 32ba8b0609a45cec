//! Delivery channels for reset codes
//!
//! [`LogDelivery`] writes codes to the debug log for local development.
//! [`WebhookDelivery`] POSTs them to an external mailer.

mod console;
mod webhook;

use std::sync::Arc;

use cinema_common::DeliveryConfig;
use cinema_core::CodeDelivery;
use tracing::info;

pub use console::LogDelivery;
pub use webhook::WebhookDelivery;

/// Pick the delivery channel described by configuration
pub fn build_delivery(config: &DeliveryConfig) -> Arc<dyn CodeDelivery> {
    match config.webhook_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => {
            info!(url, "Reset codes delivered via webhook");
            Arc::new(WebhookDelivery::new(url.to_string(), config.timeout()))
        }
        _ => {
            info!("Reset codes delivered to the log");
            Arc::new(LogDelivery::new())
        }
    }
}
