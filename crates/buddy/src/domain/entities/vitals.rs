//! BuddyVitals - The buddy's mutable vital signs
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{calendar_day_of, SleepPhase};

/// Upper bound for hp and energy
pub const MAX_VITAL: i32 = 100;
/// Lower bound for hp and energy
pub const MIN_VITAL: i32 = 0;

/// BuddyVitals - Complete vital state of a user's buddy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuddyVitals {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Avatar shown for the buddy (emoji or URL)
    pub image_url: Option<String>,
    /// Timezone that defines the owner's calendar day
    pub timezone: Tz,
    pub hp: i32,
    pub energy: i32,
    /// Pedometer steps, passed through untouched by the engine
    pub steps: i32,
    pub is_sleeping: bool,
    pub sleep_start_time: Option<DateTime<Utc>>,
    /// Hours slept on `last_sleep_date`, two decimals
    pub total_sleep_hours: f64,
    pub last_sleep_date: Option<NaiveDate>,
    /// Cups drunk today
    pub water_consumed: i32,
    pub last_updated: DateTime<Utc>,
    pub last_fed: Option<DateTime<Utc>>,
    pub last_drank: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BuddyVitals {
    /// Create a fresh buddy at full health
    pub fn new(
        user_id: Uuid,
        name: String,
        image_url: Option<String>,
        timezone: Tz,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            image_url,
            timezone,
            hp: MAX_VITAL,
            energy: MAX_VITAL,
            steps: 0,
            is_sleeping: false,
            sleep_start_time: None,
            total_sleep_hours: 0.0,
            last_sleep_date: None,
            water_consumed: 0,
            last_updated: now,
            last_fed: None,
            last_drank: None,
            created_at: now,
        }
    }

    pub fn phase(&self) -> SleepPhase {
        if self.is_sleeping {
            SleepPhase::Asleep
        } else {
            SleepPhase::Awake
        }
    }

    /// Hours slept on the calendar day of `now` (0 when nothing recorded today)
    pub fn sleep_hours_on(&self, now: DateTime<Utc>) -> f64 {
        match self.last_sleep_date {
            Some(day) if day == calendar_day_of(now, self.timezone) => self.total_sleep_hours,
            _ => 0.0,
        }
    }

    /// Reject states that no engine operation could have produced
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(MIN_VITAL..=MAX_VITAL).contains(&self.hp) {
            return Err(DomainError::Validation(format!(
                "hp {} outside {}..={}",
                self.hp, MIN_VITAL, MAX_VITAL
            )));
        }
        if !(MIN_VITAL..=MAX_VITAL).contains(&self.energy) {
            return Err(DomainError::Validation(format!(
                "energy {} outside {}..={}",
                self.energy, MIN_VITAL, MAX_VITAL
            )));
        }
        if self.water_consumed < 0 {
            return Err(DomainError::Validation(format!(
                "water_consumed {} is negative",
                self.water_consumed
            )));
        }
        if self.steps < 0 {
            return Err(DomainError::Validation(format!(
                "steps {} is negative",
                self.steps
            )));
        }
        if !self.total_sleep_hours.is_finite() || self.total_sleep_hours < 0.0 {
            return Err(DomainError::Validation(format!(
                "total_sleep_hours {} is not a non-negative number",
                self.total_sleep_hours
            )));
        }
        Ok(())
    }
}
