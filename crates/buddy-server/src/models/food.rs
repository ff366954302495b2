//! Food journal DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use buddy::FoodEntry;

use super::VitalsResponse;

/// Feed from a photo
#[derive(Debug, Deserialize, ToSchema)]
pub struct PhotoFeedRequest {
    /// Base64 encoded image bytes
    pub image_base64: String,
    /// Where the client stored the photo, if anywhere
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodEntryResponse {
    pub id: Uuid,
    pub buddy_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub confidence: f32,
    pub is_healthy: bool,
    pub labels: Vec<String>,
    pub hp_gain: i32,
    pub eaten_at: DateTime<Utc>,
}

impl From<FoodEntry> for FoodEntryResponse {
    fn from(entry: FoodEntry) -> Self {
        Self {
            id: entry.id,
            buddy_id: entry.buddy_id,
            name: entry.name,
            image_url: entry.image_url,
            confidence: entry.confidence,
            is_healthy: entry.is_healthy,
            labels: entry.labels,
            hp_gain: entry.hp_gain,
            eaten_at: entry.eaten_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PhotoFeedResponse {
    pub title: String,
    /// "I think this is: ..." followed by the buddy's reaction
    pub message: String,
    pub entry: FoodEntryResponse,
    pub buddy: VitalsResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FoodJournalQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearJournalResponse {
    pub removed: usize,
}

/// "I think this is: salad, tomato" style summary of the labels
pub fn recognized_labels(labels: &[String]) -> String {
    if labels.is_empty() {
        "I think this is: unknown food".to_string()
    } else {
        format!("I think this is: {}", labels.join(", "))
    }
}
