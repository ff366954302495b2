//! Vitals Engine - Time-driven decay and recovery of buddy vitals
//!
//! Every operation is a pure transformation: the current state and `now` go
//! in, the next state (plus notifications) comes out. Persisting the result and
//! serializing calls per buddy is the caller's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{BuddyVitals, VitalsNotification, MAX_VITAL, MIN_VITAL};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{calendar_day_of, crosses_day_boundary, Cups};

/// HP points lost per hour normally
pub const NORMAL_HP_DECAY: f64 = 0.5;
/// Extra HP points lost per hour when hungry
pub const HUNGRY_HP_DECAY: f64 = 1.5;
/// Extra HP points lost per hour when thirsty
pub const THIRSTY_HP_DECAY: f64 = 1.5;
/// Hours without food until the buddy is hungry
pub const HUNGRY_THRESHOLD_HOURS: f64 = 6.0;
/// Hours without water until the buddy is thirsty
pub const THIRSTY_THRESHOLD_HOURS: f64 = 4.0;
/// Energy points lost per hour awake
pub const ENERGY_DECAY: f64 = 0.7;
/// Energy points gained per hour asleep
pub const ENERGY_RECOVERY: f64 = 10.0;
pub const HEALTHY_FOOD_HP_GAIN: i32 = 15;
pub const UNHEALTHY_FOOD_HP_GAIN: i32 = 7;
pub const HP_PER_CUP: i32 = 2;
/// Unforced updates closer together than this (~1 minute) are dropped
pub const MIN_UPDATE_INTERVAL_HOURS: f64 = 0.016;
/// hp or energy at or below this raises a notification
pub const LOW_VITALS_THRESHOLD: i32 = 20;
/// Daily water goal in cups
pub const WATER_GOAL_CUPS: i32 = 15;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Tunable rates and thresholds for the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsConfig {
    pub normal_hp_decay: f64,
    pub hungry_hp_decay: f64,
    pub thirsty_hp_decay: f64,
    pub hungry_threshold_hours: f64,
    pub thirsty_threshold_hours: f64,
    pub energy_decay: f64,
    pub energy_recovery: f64,
    pub healthy_food_hp_gain: i32,
    pub unhealthy_food_hp_gain: i32,
    pub hp_per_cup: i32,
    pub min_update_interval_hours: f64,
    pub low_vitals_threshold: i32,
    pub water_goal_cups: i32,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            normal_hp_decay: NORMAL_HP_DECAY,
            hungry_hp_decay: HUNGRY_HP_DECAY,
            thirsty_hp_decay: THIRSTY_HP_DECAY,
            hungry_threshold_hours: HUNGRY_THRESHOLD_HOURS,
            thirsty_threshold_hours: THIRSTY_THRESHOLD_HOURS,
            energy_decay: ENERGY_DECAY,
            energy_recovery: ENERGY_RECOVERY,
            healthy_food_hp_gain: HEALTHY_FOOD_HP_GAIN,
            unhealthy_food_hp_gain: UNHEALTHY_FOOD_HP_GAIN,
            hp_per_cup: HP_PER_CUP,
            min_update_interval_hours: MIN_UPDATE_INTERVAL_HOURS,
            low_vitals_threshold: LOW_VITALS_THRESHOLD,
            water_goal_cups: WATER_GOAL_CUPS,
        }
    }
}

/// What a time-decay pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// New state must be persisted
    Applied,
    /// Too soon after the last update; nothing computed
    Throttled,
    /// Rounded vitals did not move; `last_updated` kept so decay keeps accruing
    Unchanged,
}

/// Result of [`VitalsEngine::apply_time_decay`]
#[derive(Debug, Clone, PartialEq)]
pub struct VitalsUpdate {
    pub vitals: BuddyVitals,
    pub outcome: UpdateOutcome,
    pub notifications: Vec<VitalsNotification>,
}

impl VitalsUpdate {
    fn untouched(vitals: &BuddyVitals, outcome: UpdateOutcome) -> Self {
        Self {
            vitals: vitals.clone(),
            outcome,
            notifications: Vec::new(),
        }
    }

    pub fn is_applied(&self) -> bool {
        self.outcome == UpdateOutcome::Applied
    }
}

/// Direction of a sleep toggle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum SleepTransition {
    FellAsleep,
    WokeUp { hours_slept: f64 },
}

/// Result of [`VitalsEngine::toggle_sleep`]
#[derive(Debug, Clone, PartialEq)]
pub struct SleepToggle {
    pub vitals: BuddyVitals,
    pub transition: SleepTransition,
}

/// Deterministic vitals simulation
#[derive(Debug, Clone, Default)]
pub struct VitalsEngine {
    config: VitalsConfig,
}

impl VitalsEngine {
    pub fn new(config: VitalsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VitalsConfig {
        &self.config
    }

    /// HP lost per hour at `now`, given how long ago the buddy ate and drank
    pub fn hp_decay_rate(&self, state: &BuddyVitals, now: DateTime<Utc>) -> f64 {
        let mut rate = self.config.normal_hp_decay;

        let hours_since_fed = hours_between(state.last_fed.unwrap_or(state.created_at), now);
        if hours_since_fed > self.config.hungry_threshold_hours {
            rate += self.config.hungry_hp_decay;
        }

        let hours_since_drank = hours_between(state.last_drank.unwrap_or(state.created_at), now);
        if hours_since_drank > self.config.thirsty_threshold_hours {
            rate += self.config.thirsty_hp_decay;
        }

        rate
    }

    /// Apply the decay/recovery accrued since `state.last_updated`
    ///
    /// With `force == false` calls less than a minute apart are throttled.
    pub fn apply_time_decay(
        &self,
        state: &BuddyVitals,
        now: DateTime<Utc>,
        force: bool,
    ) -> Result<VitalsUpdate, DomainError> {
        state.validate()?;

        let elapsed = hours_between(state.last_updated, now);
        if !force && elapsed < self.config.min_update_interval_hours {
            return Ok(VitalsUpdate::untouched(state, UpdateOutcome::Throttled));
        }

        let hp_loss = (self.hp_decay_rate(state, now) * elapsed).round() as i64;
        let energy_change = if state.is_sleeping {
            (self.config.energy_recovery * elapsed).round() as i64
        } else {
            -((self.config.energy_decay * elapsed).round() as i64)
        };

        let hp = clamp_vital(state.hp as i64 - hp_loss);
        let energy = clamp_vital(state.energy as i64 + energy_change);
        let new_day = crosses_day_boundary(state.last_updated, now, state.timezone);
        let water_consumed = if new_day { 0 } else { state.water_consumed };

        if hp == state.hp
            && energy == state.energy
            && water_consumed == state.water_consumed
            && !new_day
        {
            return Ok(VitalsUpdate::untouched(state, UpdateOutcome::Unchanged));
        }

        let vitals = BuddyVitals {
            hp,
            energy,
            water_consumed,
            last_updated: state.last_updated.max(now),
            ..state.clone()
        };

        let mut notifications = Vec::new();
        if vitals.hp <= self.config.low_vitals_threshold {
            notifications.push(VitalsNotification::low_hp(&vitals.name));
        }
        if vitals.energy <= self.config.low_vitals_threshold {
            notifications.push(VitalsNotification::low_energy(&vitals.name));
        }

        Ok(VitalsUpdate {
            vitals,
            outcome: UpdateOutcome::Applied,
            notifications,
        })
    }

    /// HP a meal is worth
    pub fn food_hp_gain(&self, is_healthy: bool) -> i32 {
        if is_healthy {
            self.config.healthy_food_hp_gain
        } else {
            self.config.unhealthy_food_hp_gain
        }
    }

    pub fn feed(
        &self,
        state: &BuddyVitals,
        now: DateTime<Utc>,
        is_healthy: bool,
    ) -> Result<BuddyVitals, DomainError> {
        state.validate()?;

        let gain = self.food_hp_gain(is_healthy) as i64;
        Ok(BuddyVitals {
            hp: clamp_vital(state.hp as i64 + gain),
            last_fed: Some(now),
            ..state.clone()
        })
    }

    pub fn drink(
        &self,
        state: &BuddyVitals,
        now: DateTime<Utc>,
        cups: Cups,
    ) -> Result<BuddyVitals, DomainError> {
        state.validate()?;

        let cups = cups.get() as i64;
        let hp_gain = cups.saturating_mul(self.config.hp_per_cup as i64);
        let water_consumed = (state.water_consumed as i64)
            .saturating_add(cups)
            .min(i32::MAX as i64) as i32;

        Ok(BuddyVitals {
            hp: clamp_vital(state.hp as i64 + hp_gain),
            water_consumed,
            last_drank: Some(now),
            ..state.clone()
        })
    }

    /// Flip between awake and asleep
    ///
    /// Falling asleep should be preceded by a forced [`apply_time_decay`] so the
    /// awake decay up to `now` is not lost.
    ///
    /// [`apply_time_decay`]: VitalsEngine::apply_time_decay
    pub fn toggle_sleep(
        &self,
        state: &BuddyVitals,
        now: DateTime<Utc>,
    ) -> Result<SleepToggle, DomainError> {
        state.validate()?;

        let last_updated = state.last_updated.max(now);

        if !state.is_sleeping {
            return Ok(SleepToggle {
                vitals: BuddyVitals {
                    is_sleeping: true,
                    sleep_start_time: Some(now),
                    last_updated,
                    ..state.clone()
                },
                transition: SleepTransition::FellAsleep,
            });
        }

        // A sleeping buddy without a start time slept for zero hours
        let started = state.sleep_start_time.unwrap_or(now);
        let hours_slept = round_hundredths(hours_between(started, now));

        // Updates applied during the sleep already credited recovery up to last_updated
        let recovery_hours = if state.last_updated > started {
            round_hundredths(hours_between(state.last_updated, now))
        } else {
            hours_slept
        };
        let energy_gain = (self.config.energy_recovery * recovery_hours).round() as i64;

        let today = calendar_day_of(now, state.timezone);
        let total_sleep_hours = if state.last_sleep_date == Some(today) {
            round_hundredths(state.total_sleep_hours + hours_slept)
        } else {
            hours_slept
        };

        Ok(SleepToggle {
            vitals: BuddyVitals {
                energy: clamp_vital(state.energy as i64 + energy_gain),
                is_sleeping: false,
                sleep_start_time: None,
                total_sleep_hours,
                last_sleep_date: Some(today),
                last_updated,
                ..state.clone()
            },
            transition: SleepTransition::WokeUp { hours_slept },
        })
    }
}

/// Non-negative hours from `from` to `to`
fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    ((to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR).max(0.0)
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn clamp_vital(value: i64) -> i32 {
    value.clamp(MIN_VITAL as i64, MAX_VITAL as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NotificationKind;
    use crate::domain::value_objects::SleepPhase;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    /// Buddy that just ate and drank at t0
    fn mock_vitals() -> BuddyVitals {
        let mut vitals = BuddyVitals::new(
            Uuid::new_v4(),
            "Mochi".to_string(),
            None,
            chrono_tz::UTC,
            t0(),
        );
        vitals.last_fed = Some(t0());
        vitals.last_drank = Some(t0());
        vitals
    }

    fn engine() -> VitalsEngine {
        VitalsEngine::default()
    }

    #[test]
    fn test_decay_at_last_updated_is_noop() {
        let state = mock_vitals();
        let update = engine().apply_time_decay(&state, t0(), false).unwrap();

        assert_eq!(update.outcome, UpdateOutcome::Throttled);
        assert_eq!(update.vitals, state);
        assert!(update.notifications.is_empty());
    }

    #[test]
    fn test_second_call_within_a_minute_is_throttled() {
        let engine = engine();
        let state = mock_vitals();

        let first = engine
            .apply_time_decay(&state, t0() + Duration::hours(3), false)
            .unwrap();
        assert!(first.is_applied());

        let again = engine
            .apply_time_decay(&first.vitals, t0() + Duration::hours(3), false)
            .unwrap();
        assert_eq!(again.outcome, UpdateOutcome::Throttled);
        assert_eq!(again.vitals, first.vitals);

        let shortly_after = engine
            .apply_time_decay(
                &first.vitals,
                t0() + Duration::hours(3) + Duration::seconds(30),
                false,
            )
            .unwrap();
        assert_eq!(shortly_after.outcome, UpdateOutcome::Throttled);
        assert_eq!(shortly_after.vitals, first.vitals);
    }

    #[test]
    fn test_force_bypasses_throttle() {
        let mut state = mock_vitals();
        state.is_sleeping = true;
        state.sleep_start_time = Some(t0());
        state.energy = 50;

        // 6 minutes asleep recovers 1 energy point
        let update = engine()
            .apply_time_decay(&state, t0() + Duration::minutes(6), true)
            .unwrap();
        assert!(update.is_applied());
        assert_eq!(update.vitals.energy, 51);
        assert_eq!(update.vitals.last_updated, t0() + Duration::minutes(6));
    }

    #[test]
    fn test_sub_point_decay_is_unchanged_and_keeps_last_updated() {
        let state = mock_vitals();
        // 0.5 * (1/60) rounds to zero hp, 0.7 * (1/60) rounds to zero energy
        let update = engine()
            .apply_time_decay(&state, t0() + Duration::minutes(1), false)
            .unwrap();

        assert_eq!(update.outcome, UpdateOutcome::Unchanged);
        assert_eq!(update.vitals.last_updated, t0());
    }

    #[test]
    fn test_normal_decay() {
        let state = mock_vitals();
        let update = engine()
            .apply_time_decay(&state, t0() + Duration::hours(2), false)
            .unwrap();

        // 0.5/h * 2h = 1 hp; 0.7/h * 2h = 1.4 -> 1 energy
        assert_eq!(update.vitals.hp, 99);
        assert_eq!(update.vitals.energy, 99);
        assert_eq!(update.vitals.last_updated, t0() + Duration::hours(2));
    }

    #[test]
    fn test_hungry_and_thirsty_compound() {
        let state = mock_vitals();
        let now = t0() + Duration::hours(8);

        assert_eq!(engine().hp_decay_rate(&state, now), 3.5);

        let update = engine().apply_time_decay(&state, now, false).unwrap();
        assert_eq!(update.vitals.hp, 100 - 28);
    }

    #[test]
    fn test_only_thirsty() {
        let state = mock_vitals();
        let now = t0() + Duration::hours(5);
        // Past the 4h thirst threshold, not yet hungry
        assert_eq!(engine().hp_decay_rate(&state, now), 2.0);
    }

    #[test]
    fn test_hunger_measured_from_last_meal() {
        let mut state = mock_vitals();
        // Last update was recent, but the last meal was 7 hours ago
        state.last_fed = Some(t0() - Duration::hours(7));
        state.last_drank = Some(t0());
        let now = t0() + Duration::minutes(30);

        assert_eq!(engine().hp_decay_rate(&state, now), 2.0);
    }

    #[test]
    fn test_never_fed_counts_from_creation() {
        let mut state = mock_vitals();
        state.last_fed = None;
        state.last_drank = None;
        let now = t0() + Duration::hours(7);

        assert_eq!(engine().hp_decay_rate(&state, now), 3.5);
    }

    #[test]
    fn test_vitals_never_go_below_zero() {
        let mut state = mock_vitals();
        state.hp = 5;
        state.energy = 3;
        let update = engine()
            .apply_time_decay(&state, t0() + Duration::days(3), false)
            .unwrap();

        assert_eq!(update.vitals.hp, 0);
        assert_eq!(update.vitals.energy, 0);
    }

    #[test]
    fn test_sleep_recovery_capped_at_max() {
        let mut state = mock_vitals();
        state.is_sleeping = true;
        state.sleep_start_time = Some(t0());
        state.energy = 95;

        let update = engine()
            .apply_time_decay(&state, t0() + Duration::hours(3), false)
            .unwrap();
        assert_eq!(update.vitals.energy, 100);
    }

    #[test]
    fn test_day_rollover_resets_water() {
        let mut state = mock_vitals();
        state.water_consumed = 10;
        let next_day = Utc.with_ymd_and_hms(2024, 6, 2, 0, 1, 0).unwrap();
        state.last_updated = Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 0).unwrap();
        state.last_drank = Some(state.last_updated);
        state.last_fed = Some(state.last_updated);

        let update = engine().apply_time_decay(&state, next_day, false).unwrap();
        assert!(update.is_applied());
        assert_eq!(update.vitals.water_consumed, 0);
        assert_eq!(update.vitals.hp, state.hp);
    }

    #[test]
    fn test_same_day_keeps_water() {
        let mut state = mock_vitals();
        state.water_consumed = 4;
        let update = engine()
            .apply_time_decay(&state, t0() + Duration::hours(3), false)
            .unwrap();
        assert_eq!(update.vitals.water_consumed, 4);
    }

    #[test]
    fn test_clock_skew_is_zero_elapsed() {
        let state = mock_vitals();
        let earlier = t0() - Duration::hours(5);

        let update = engine().apply_time_decay(&state, earlier, true).unwrap();
        assert_eq!(update.outcome, UpdateOutcome::Unchanged);
        assert_eq!(update.vitals.hp, state.hp);
        assert_eq!(update.vitals.last_updated, t0());
    }

    #[test]
    fn test_low_hp_notification_fires_once() {
        let mut state = mock_vitals();
        state.hp = 22;
        let update = engine()
            .apply_time_decay(&state, t0() + Duration::hours(4), false)
            .unwrap();

        assert_eq!(update.vitals.hp, 20);
        let low_hp: Vec<_> = update
            .notifications
            .iter()
            .filter(|n| n.kind == NotificationKind::LowHp)
            .collect();
        assert_eq!(low_hp.len(), 1);
    }

    #[test]
    fn test_no_notification_above_threshold() {
        let mut state = mock_vitals();
        state.hp = 30;
        let update = engine()
            .apply_time_decay(&state, t0() + Duration::hours(4), false)
            .unwrap();

        assert_eq!(update.vitals.hp, 28);
        assert!(update.notifications.is_empty());
    }

    #[test]
    fn test_low_hp_and_energy_combine() {
        let mut state = mock_vitals();
        state.hp = 21;
        state.energy = 21;
        let update = engine()
            .apply_time_decay(&state, t0() + Duration::hours(3), false)
            .unwrap();

        let kinds: Vec<_> = update.notifications.iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::LowHp, NotificationKind::LowEnergy]);
    }

    #[test]
    fn test_invalid_state_is_rejected() {
        let mut state = mock_vitals();
        state.hp = 140;
        let result = engine().apply_time_decay(&state, t0() + Duration::hours(1), true);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_healthy_food_clamped() {
        let mut state = mock_vitals();
        state.hp = 90;
        let now = t0() + Duration::hours(1);
        let fed = engine().feed(&state, now, true).unwrap();

        assert_eq!(fed.hp, 100);
        assert_eq!(fed.last_fed, Some(now));
        assert_eq!(fed.energy, state.energy);
        assert_eq!(fed.water_consumed, state.water_consumed);
        assert_eq!(fed.last_updated, state.last_updated);
    }

    #[test]
    fn test_unhealthy_food_gain() {
        let mut state = mock_vitals();
        state.hp = 50;
        let fed = engine().feed(&state, t0(), false).unwrap();
        assert_eq!(fed.hp, 57);
    }

    #[test]
    fn test_drink_three_cups() {
        let mut state = mock_vitals();
        state.hp = 60;
        state.water_consumed = 2;
        let now = t0() + Duration::hours(1);
        let drank = engine().drink(&state, now, Cups::new(3)).unwrap();

        assert_eq!(drank.water_consumed, 5);
        assert_eq!(drank.hp, 66);
        assert_eq!(drank.last_drank, Some(now));
    }

    #[test]
    fn test_drink_hp_clamped() {
        let mut state = mock_vitals();
        state.hp = 99;
        let drank = engine().drink(&state, t0(), Cups::new(3)).unwrap();
        assert_eq!(drank.hp, 100);
        assert_eq!(drank.water_consumed, 3);
    }

    #[test]
    fn test_sleep_round_trip() {
        let engine = engine();
        let mut state = mock_vitals();
        state.energy = 50;

        let asleep = engine.toggle_sleep(&state, t0()).unwrap();
        assert_eq!(asleep.transition, SleepTransition::FellAsleep);
        assert_eq!(asleep.vitals.phase(), SleepPhase::Asleep);
        assert_eq!(asleep.vitals.sleep_start_time, Some(t0()));

        let awake = engine
            .toggle_sleep(&asleep.vitals, t0() + Duration::hours(2))
            .unwrap();
        assert_eq!(awake.transition, SleepTransition::WokeUp { hours_slept: 2.0 });
        assert_eq!(awake.vitals.energy, 70);
        assert!(!awake.vitals.is_sleeping);
        assert!(awake.vitals.sleep_start_time.is_none());
        assert_eq!(awake.vitals.total_sleep_hours, 2.0);
        assert_eq!(
            awake.vitals.last_sleep_date,
            Some(calendar_day_of(t0(), chrono_tz::UTC))
        );
        assert_eq!(awake.vitals.last_updated, t0() + Duration::hours(2));
    }

    #[test]
    fn test_naps_accumulate_same_day() {
        let engine = engine();
        let mut state = mock_vitals();
        state.energy = 10;
        state.total_sleep_hours = 1.25;
        state.last_sleep_date = Some(calendar_day_of(t0(), chrono_tz::UTC));

        let asleep = engine.toggle_sleep(&state, t0()).unwrap();
        let awake = engine
            .toggle_sleep(&asleep.vitals, t0() + Duration::minutes(30))
            .unwrap();

        assert_eq!(awake.vitals.total_sleep_hours, 1.75);
        assert_eq!(awake.vitals.energy, 15);
    }

    #[test]
    fn test_sleep_total_resets_on_new_day() {
        let engine = engine();
        let mut state = mock_vitals();
        state.total_sleep_hours = 8.0;
        state.last_sleep_date = Some(calendar_day_of(t0() - Duration::days(1), chrono_tz::UTC));

        let asleep = engine.toggle_sleep(&state, t0()).unwrap();
        let awake = engine
            .toggle_sleep(&asleep.vitals, t0() + Duration::hours(1))
            .unwrap();

        assert_eq!(awake.vitals.total_sleep_hours, 1.0);
        assert_eq!(
            awake.vitals.last_sleep_date,
            Some(calendar_day_of(t0(), chrono_tz::UTC))
        );
    }

    #[test]
    fn test_wake_does_not_double_count_ticked_recovery() {
        let engine = engine();
        let mut state = mock_vitals();
        state.energy = 50;

        let asleep = engine.toggle_sleep(&state, t0()).unwrap().vitals;
        let ticked = engine
            .apply_time_decay(&asleep, t0() + Duration::hours(1), false)
            .unwrap();
        assert_eq!(ticked.vitals.energy, 60);

        let awake = engine
            .toggle_sleep(&ticked.vitals, t0() + Duration::hours(2))
            .unwrap();
        assert_eq!(awake.vitals.energy, 70);
        assert_eq!(awake.transition, SleepTransition::WokeUp { hours_slept: 2.0 });
    }

    #[test]
    fn test_wake_without_start_time_is_zero_duration() {
        let mut state = mock_vitals();
        state.is_sleeping = true;
        state.sleep_start_time = None;
        state.energy = 40;

        let awake = engine()
            .toggle_sleep(&state, t0() + Duration::hours(3))
            .unwrap();
        assert_eq!(awake.transition, SleepTransition::WokeUp { hours_slept: 0.0 });
        assert_eq!(awake.vitals.energy, 40);
        assert!(!awake.vitals.is_sleeping);
    }

    #[test]
    fn test_hours_slept_rounded_to_hundredths() {
        let engine = engine();
        let state = mock_vitals();
        let asleep = engine.toggle_sleep(&state, t0()).unwrap();
        let awake = engine
            .toggle_sleep(&asleep.vitals, t0() + Duration::seconds(4000))
            .unwrap();

        // 4000s = 1.1111h
        assert_eq!(awake.transition, SleepTransition::WokeUp { hours_slept: 1.11 });
    }

    #[test]
    fn test_operations_are_deterministic() {
        let engine = engine();
        let mut state = mock_vitals();
        state.hp = 40;
        let now = t0() + Duration::hours(9);

        let a = engine.apply_time_decay(&state, now, false).unwrap();
        let b = engine.apply_time_decay(&state, now, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_vitals_stay_in_range_across_operations() {
        let engine = engine();
        let mut state = mock_vitals();
        let mut now = t0();

        for step in 0..200 {
            now += Duration::minutes(37);
            state = match step % 5 {
                0 => engine.apply_time_decay(&state, now, false).unwrap().vitals,
                1 => engine.feed(&state, now, step % 2 == 0).unwrap(),
                2 => engine.drink(&state, now, Cups::new(step)).unwrap(),
                3 => engine.toggle_sleep(&state, now).unwrap().vitals,
                _ => engine.apply_time_decay(&state, now, true).unwrap().vitals,
            };
            assert!((0..=100).contains(&state.hp), "hp {}", state.hp);
            assert!((0..=100).contains(&state.energy), "energy {}", state.energy);
            assert!(state.is_sleeping == state.sleep_start_time.is_some());
        }
    }
}
