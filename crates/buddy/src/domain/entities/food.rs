//! Food - Classifier results and the food journal
//!
//! Pure domain entities without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name used when the classifier returned no labels
pub const UNKNOWN_FOOD: &str = "Unknown Food";

/// Outcome of classifying a food photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysis {
    pub is_healthy: bool,
    /// Top labels, best match first
    #[serde(default)]
    pub labels: Vec<String>,
    /// Confidence of the best label (0.0 - 1.0)
    #[serde(default)]
    pub confidence: f32,
}

/// FoodEntry - One meal in the buddy's food journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub buddy_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub confidence: f32,
    pub is_healthy: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    /// HP the meal gave the buddy
    pub hp_gain: i32,
    pub eaten_at: DateTime<Utc>,
}

impl FoodEntry {
    /// Journal a classified meal
    pub fn from_analysis(
        buddy_id: Uuid,
        analysis: &FoodAnalysis,
        image_url: Option<String>,
        hp_gain: i32,
        eaten_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            buddy_id,
            name: analysis
                .labels
                .first()
                .cloned()
                .unwrap_or_else(|| UNKNOWN_FOOD.to_string()),
            image_url,
            confidence: analysis.confidence,
            is_healthy: analysis.is_healthy,
            labels: analysis.labels.clone(),
            hp_gain,
            eaten_at,
        }
    }
}
