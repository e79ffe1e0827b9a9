//! Outgoing notifications for contact-form submissions.

use anyhow::Result;
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const EVENT_CONTACT_RECEIVED: &str = "contact.received";

const MAX_ATTEMPTS: u32 = 3;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct WebhookTarget {
    pub url: String,
    pub secret: Option<String>,
}

impl WebhookTarget {
    pub fn from_config(config: &crate::config::ContactConfig) -> Option<Self> {
        config.webhook_url.as_ref().map(|url| Self {
            url: url.clone(),
            secret: config.webhook_secret.clone(),
        })
    }
}

/// `sha256=<hex>` HMAC of the raw request body.
pub fn sign(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("invalid webhook secret: {}", e))?;
    mac.update(payload.as_bytes());
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Delivers `payload` in the background. Failures are logged, never returned.
#[cfg(feature = "webhooks")]
pub fn fire(target: &WebhookTarget, event: &str, payload: serde_json::Value) {
    let target = target.clone();
    let event = event.to_string();

    tokio::spawn(async move {
        let body = payload.to_string();
        let delivery_id = uuid::Uuid::new_v4().to_string();
        let signature = match target.secret.as_deref().map(|s| sign(s, &body)).transpose() {
            Ok(sig) => sig,
            Err(e) => {
                tracing::error!("Webhook not sent: {}", e);
                return;
            }
        };

        let client = reqwest::Client::new();
        let mut attempts = 0;
        let mut last_status = None;

        while attempts < MAX_ATTEMPTS {
            attempts += 1;

            let mut request = client
                .post(&target.url)
                .header("Content-Type", "application/json")
                .header("X-Folio-Event", &event)
                .header("X-Folio-Delivery", &delivery_id)
                .header("User-Agent", "Folio-Webhook/1.0");
            if let Some(ref sig) = signature {
                request = request.header("X-Folio-Signature", sig);
            }

            match request.body(body.clone()).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(
                        "Webhook delivered: {} -> {} ({})",
                        event,
                        target.url,
                        resp.status().as_u16()
                    );
                    return;
                }
                Ok(resp) => last_status = Some(resp.status().as_u16()),
                Err(e) => tracing::debug!("Webhook attempt {} failed: {}", attempts, e),
            }

            if attempts < MAX_ATTEMPTS {
                let delay = std::time::Duration::from_secs(1 << (2 * (attempts - 1)));
                tokio::time::sleep(delay).await;
            }
        }

        tracing::warn!(
            "Webhook failed after {} attempts: {} -> {} (last status {:?})",
            attempts,
            event,
            target.url,
            last_status
        );
    });
}

#[cfg(not(feature = "webhooks"))]
pub fn fire(target: &WebhookTarget, event: &str, _payload: serde_json::Value) {
    tracing::debug!(
        "webhooks feature disabled, not sending {} to {}",
        event,
        target.url
    );
}
