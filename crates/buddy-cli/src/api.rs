//! Buddy API Client

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// API Client for the Buddy server
pub struct BuddyClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct BuddyResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub timezone: String,
    pub hp: i32,
    pub energy: i32,
    pub steps: i32,
    pub is_sleeping: bool,
    pub sleep_start_time: Option<DateTime<Utc>>,
    pub slept_today: f64,
    pub water_consumed: i32,
    pub water_goal: i32,
    pub last_updated: DateTime<Utc>,
    pub last_fed: Option<DateTime<Utc>>,
    pub last_drank: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBuddyResponse {
    pub created: bool,
    pub buddy: BuddyResponse,
}

#[derive(Debug, Deserialize)]
pub struct NotificationResponse {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TickResponse {
    pub outcome: String,
    pub notifications: Vec<NotificationResponse>,
    pub buddy: BuddyResponse,
}

#[derive(Debug, Deserialize)]
pub struct ActionResponse {
    pub title: String,
    pub message: String,
    pub buddy: BuddyResponse,
}

#[derive(Debug, Deserialize)]
pub struct FoodEntryResponse {
    pub name: String,
    pub confidence: f32,
    pub is_healthy: bool,
    pub labels: Vec<String>,
    pub hp_gain: i32,
    pub eaten_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoFeedResponse {
    pub title: String,
    pub message: String,
    pub entry: FoodEntryResponse,
    pub buddy: BuddyResponse,
}

#[derive(Debug, Deserialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub ticking: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateBuddyRequest<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<&'a str>,
}

impl BuddyClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer key and decode a JSON body, turning non-2xx into errors
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        };

        let resp = request
            .send()
            .await
            .context("Failed to connect to Buddy API")?;

        let status = resp.status();
        tracing::debug!("Buddy API responded {}", status);
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// Create a buddy, or get the one the user already has
    pub async fn create_buddy(&self, request: &CreateBuddyRequest<'_>) -> Result<CreateBuddyResponse> {
        self.send(self.client.post(self.url("/buddy")).json(request))
            .await
    }

    /// Current vitals, with pending decay applied
    pub async fn get_buddy(&self, buddy_id: Uuid) -> Result<BuddyResponse> {
        self.send(self.client.get(self.url(&format!("/buddy/{}", buddy_id))))
            .await
    }

    pub async fn tick(&self, buddy_id: Uuid, force: bool) -> Result<TickResponse> {
        self.send(
            self.client
                .post(self.url(&format!("/buddy/{}/tick", buddy_id)))
                .json(&json!({ "force": force })),
        )
        .await
    }

    pub async fn feed(&self, buddy_id: Uuid, healthy: bool) -> Result<ActionResponse> {
        self.send(
            self.client
                .post(self.url(&format!("/buddy/{}/feed", buddy_id)))
                .json(&json!({ "healthy": healthy })),
        )
        .await
    }

    /// Classify a photo on the server and feed the result
    pub async fn feed_photo(
        &self,
        buddy_id: Uuid,
        image: &[u8],
        image_url: Option<&str>,
    ) -> Result<PhotoFeedResponse> {
        let body = json!({
            "image_base64": STANDARD.encode(image),
            "image_url": image_url,
        });
        self.send(
            self.client
                .post(self.url(&format!("/buddy/{}/food/photo", buddy_id)))
                .json(&body),
        )
        .await
    }

    /// Cups are sent as text so the server normalizes anything unparseable
    pub async fn drink(&self, buddy_id: Uuid, cups: &str) -> Result<ActionResponse> {
        self.send(
            self.client
                .post(self.url(&format!("/buddy/{}/drink", buddy_id)))
                .json(&json!({ "cups": cups })),
        )
        .await
    }

    pub async fn toggle_sleep(&self, buddy_id: Uuid) -> Result<ActionResponse> {
        self.send(self.client.post(self.url(&format!("/buddy/{}/sleep", buddy_id))))
            .await
    }

    pub async fn record_steps(&self, buddy_id: Uuid, steps: i64) -> Result<BuddyResponse> {
        self.send(
            self.client
                .put(self.url(&format!("/buddy/{}/steps", buddy_id)))
                .json(&json!({ "steps": steps })),
        )
        .await
    }

    /// Newest meals first
    pub async fn food_journal(&self, buddy_id: Uuid, limit: usize) -> Result<Vec<FoodEntryResponse>> {
        self.send(
            self.client
                .get(self.url(&format!("/buddy/{}/food", buddy_id)))
                .query(&[("limit", limit)]),
        )
        .await
    }

    pub async fn clear_food_journal(&self, buddy_id: Uuid) -> Result<RemovedResponse> {
        self.send(self.client.delete(self.url(&format!("/buddy/{}/food", buddy_id))))
            .await
    }

    /// Start or stop the server-side periodic tick
    pub async fn set_session(&self, buddy_id: Uuid, active: bool) -> Result<SessionResponse> {
        let url = self.url(&format!("/buddy/{}/session", buddy_id));
        let request = if active {
            self.client.post(url)
        } else {
            self.client.delete(url)
        };
        self.send(request).await
    }

    /// Delete all but the most recently updated buddy of a user
    pub async fn cleanup_duplicates(&self, user_id: Uuid) -> Result<RemovedResponse> {
        self.send(
            self.client
                .post(self.url(&format!("/users/{}/buddy/cleanup", user_id))),
        )
        .await
    }
}
