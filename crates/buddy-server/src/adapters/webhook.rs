//! HTTP Webhook Notification Sink
//!
//! Posts low-vitals notifications to an external endpoint using reqwest,
//! signed with HMAC-SHA256 when a secret is configured.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use buddy::{BuddyVitals, DomainError, NotificationKind, NotificationSink, VitalsNotification};

/// Header carrying the `sha256=<hex>` payload signature
pub const SIGNATURE_HEADER: &str = "X-Buddy-Signature";

/// Delivery tuning for the webhook sink
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base delay for exponential backoff (milliseconds)
    pub retry_base_delay_ms: u64,
    /// Maximum delay between retries (milliseconds)
    pub retry_max_delay_ms: u64,
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 5000,
            timeout: Duration::from_secs(10),
            user_agent: "Buddy-Webhook/1.0".to_string(),
        }
    }
}

/// JSON body posted to the webhook
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    /// `vitals.low-hp` or `vitals.low-energy`
    pub event: String,
    pub kind: NotificationKind,
    pub message: String,
    pub buddy_id: Uuid,
    pub user_id: Uuid,
    pub buddy_name: String,
    pub hp: i32,
    pub energy: i32,
    pub sent_at: DateTime<Utc>,
}

impl NotificationPayload {
    pub fn new(vitals: &BuddyVitals, notification: &VitalsNotification, sent_at: DateTime<Utc>) -> Self {
        Self {
            event: format!("vitals.{}", notification.kind),
            kind: notification.kind,
            message: notification.message.clone(),
            buddy_id: vitals.id,
            user_id: vitals.user_id,
            buddy_name: vitals.name.clone(),
            hp: vitals.hp,
            energy: vitals.energy,
            sent_at,
        }
    }
}

/// HTTP implementation of NotificationSink
pub struct WebhookNotificationSink {
    client: Client,
    url: String,
    secret: Option<String>,
    config: WebhookConfig,
}

impl WebhookNotificationSink {
    pub fn new(url: String, secret: Option<String>) -> Result<Self, DomainError> {
        Self::with_config(url, secret, WebhookConfig::default())
    }

    pub fn with_config(
        url: String,
        secret: Option<String>,
        config: WebhookConfig,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            secret,
            config,
        })
    }

    /// One delivery attempt
    async fn deliver(&self, body: &[u8]) -> Result<(), DomainError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json");

        if let Some(secret) = &self.secret {
            request = request.header(SIGNATURE_HEADER, sign_payload(secret, body));
        }

        let response = request
            .body(body.to_vec())
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Webhook request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "No response body".to_string());
        Err(DomainError::ExternalService(format!(
            "Webhook returned {}: {}",
            status.as_u16(),
            body
        )))
    }
}

#[async_trait]
impl NotificationSink for WebhookNotificationSink {
    async fn notify(
        &self,
        vitals: &BuddyVitals,
        notification: &VitalsNotification,
    ) -> Result<(), DomainError> {
        let payload = NotificationPayload::new(vitals, notification, Utc::now());
        let body = serde_json::to_vec(&payload).map_err(|e| {
            DomainError::ExternalService(format!("Failed to serialize payload: {e}"))
        })?;

        let mut delay = self.config.retry_base_delay_ms;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                // Wait before retry
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = (delay * 2).min(self.config.retry_max_delay_ms);
            }

            match self.deliver(&body).await {
                Ok(()) => {
                    tracing::debug!("🔔 Delivered {} for buddy {}", payload.event, vitals.id);
                    return Ok(());
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DomainError::ExternalService("Webhook delivery failed".to_string())
        }))
    }
}

/// Hex-encoded HMAC-SHA256 of `payload` with a `sha256=` prefix
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    // HMAC accepts keys of any length, so this never fails
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
