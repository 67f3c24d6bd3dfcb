//! Best-effort outbound order notifications
//!
//! One POST per submitted order to a user-configured automation URL. The
//! order is already persisted by the time this runs; delivery failure is
//! logged and otherwise ignored. No retries, no response validation.

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::Order;

#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), url }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Fires the `order.created` notification on a detached task.
    pub fn notify_order_created(&self, order: &Order) {
        let Some(url) = self.url.clone() else {
            debug!("order webhook not configured, skipping notification");
            return;
        };
        let payload = serde_json::json!({
            "event": "order.created",
            "timestamp": Utc::now(),
            "source": "paddock-store",
            "order": order,
        });
        let client = self.client.clone();
        let order_number = order.order_number.clone();
        tokio::spawn(async move {
            if let Err(err) = client.post(&url).json(&payload).send().await {
                warn!(%order_number, %err, "order webhook delivery failed");
            }
        });
    }
}
