//! Vitals request/response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use buddy::{BuddyVitals, Cups, SleepTransition, UpdateOutcome, VitalsNotification};

/// Buddy vitals as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VitalsResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    /// IANA timezone defining the buddy's calendar day
    pub timezone: String,
    pub hp: i32,
    pub energy: i32,
    pub steps: i32,
    pub is_sleeping: bool,
    pub sleep_start_time: Option<DateTime<Utc>>,
    pub total_sleep_hours: f64,
    pub last_sleep_date: Option<NaiveDate>,
    /// Hours slept on the current calendar day
    pub slept_today: f64,
    pub water_consumed: i32,
    pub water_goal: i32,
    pub last_updated: DateTime<Utc>,
    pub last_fed: Option<DateTime<Utc>>,
    pub last_drank: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl VitalsResponse {
    pub fn new(vitals: BuddyVitals, water_goal: i32, now: DateTime<Utc>) -> Self {
        let slept_today = vitals.sleep_hours_on(now);
        Self {
            id: vitals.id,
            user_id: vitals.user_id,
            name: vitals.name,
            image_url: vitals.image_url,
            timezone: vitals.timezone.name().to_string(),
            hp: vitals.hp,
            energy: vitals.energy,
            steps: vitals.steps,
            is_sleeping: vitals.is_sleeping,
            sleep_start_time: vitals.sleep_start_time,
            total_sleep_hours: vitals.total_sleep_hours,
            last_sleep_date: vitals.last_sleep_date,
            slept_today,
            water_consumed: vitals.water_consumed,
            water_goal,
            last_updated: vitals.last_updated,
            last_fed: vitals.last_fed,
            last_drank: vitals.last_drank,
            created_at: vitals.created_at,
        }
    }
}

/// Create Buddy request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBuddyRequest {
    pub user_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    /// IANA timezone name, defaults to UTC
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBuddyResponse {
    /// False when the user already had a buddy
    pub created: bool,
    pub buddy: VitalsResponse,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TickRequest {
    /// Bypass the one-minute throttle
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    /// `low-hp` or `low-energy`
    pub kind: String,
    pub message: String,
}

impl From<VitalsNotification> for NotificationResponse {
    fn from(notification: VitalsNotification) -> Self {
        Self {
            kind: notification.kind.to_string(),
            message: notification.message,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TickResponse {
    /// `applied`, `throttled` or `unchanged`
    pub outcome: String,
    pub notifications: Vec<NotificationResponse>,
    pub buddy: VitalsResponse,
}

pub fn outcome_name(outcome: UpdateOutcome) -> &'static str {
    match outcome {
        UpdateOutcome::Applied => "applied",
        UpdateOutcome::Throttled => "throttled",
        UpdateOutcome::Unchanged => "unchanged",
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedRequest {
    pub healthy: bool,
}

/// Response for user actions (feed, drink, sleep)
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Title of the confirmation, e.g. "Refreshing!"
    pub title: String,
    pub message: String,
    pub buddy: VitalsResponse,
}

/// Cups as a number or as free text ("2", "a few")
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CupsInput {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<CupsInput> for Cups {
    fn from(input: CupsInput) -> Self {
        match input {
            CupsInput::Number(n) => Cups::new(n),
            CupsInput::Text(text) => Cups::parse(&text),
            CupsInput::Other(_) => Cups::ONE,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DrinkRequest {
    /// Positive number of cups; anything else counts as 1
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub cups: Option<CupsInput>,
}

impl DrinkRequest {
    pub fn cups(self) -> Cups {
        self.cups.map(Cups::from).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StepsRequest {
    pub steps: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub buddy_id: Uuid,
    /// Whether the periodic tick is running for this buddy
    pub ticking: bool,
}

// ============================================
// Confirmation messages
// ============================================

pub fn feed_message(name: &str, healthy: bool) -> (String, String) {
    if healthy {
        (
            "Healthy Food! 🥗".to_string(),
            format!("Great choice! {} is happy about this healthy meal!", name),
        )
    } else {
        (
            "Unhealthy Food! 🍔".to_string(),
            format!("{} would prefer something healthier next time!", name),
        )
    }
}

pub fn drink_message(name: &str, cups: Cups, total: i32) -> (String, String) {
    (
        "Refreshing!".to_string(),
        format!(
            "{} has had {} of water! That's {} cups today.",
            name, cups, total
        ),
    )
}

pub fn sleep_message(name: &str, transition: SleepTransition) -> (String, String) {
    match transition {
        SleepTransition::FellAsleep => ("Sleep tight!".to_string(), format!("{} is now sleeping!", name)),
        SleepTransition::WokeUp { hours_slept } => (
            "Good morning!".to_string(),
            format!(
                "{} slept for {:.1} hours and feels refreshed!",
                name, hours_slept
            ),
        ),
    }
}
