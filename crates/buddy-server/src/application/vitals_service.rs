//! Vitals Application Service (Use Case)
//!
//! Runs every vitals operation as one serialized unit per buddy:
//! lock → load → compute (pure engine) → persist → notify.
//! A transient store failure retries the whole unit, so a computed state is
//! only ever reported once it has been saved. Notifications are delivered in
//! the background and never delay the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use buddy::{
    BuddyVitals, Clock, Cups, DomainError, NotificationKind, NotificationSink, SleepToggle,
    UpdateOutcome, VitalsEngine, VitalsNotification, VitalsRepository, VitalsUpdate,
};

use super::BuddyLocks;

const ENTITY: &str = "BuddyVitals";

/// Backoff for retrying a unit of work after a transient store failure
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): base * 2^(attempt-1), capped
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// State computed inside a unit of work
struct Mutation<T> {
    next: BuddyVitals,
    persist: bool,
    notifications: Vec<VitalsNotification>,
    output: T,
}

/// A persisted unit of work
struct Committed<T> {
    vitals: BuddyVitals,
    notifications: Vec<VitalsNotification>,
    output: T,
}

/// Application service for buddy vitals
pub struct VitalsService<R: VitalsRepository> {
    repo: Arc<R>,
    engine: VitalsEngine,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    buddy_locks: BuddyLocks,
    user_locks: BuddyLocks,
    retry: RetryPolicy,
}

impl<R: VitalsRepository> VitalsService<R> {
    pub fn new(
        repo: Arc<R>,
        engine: VitalsEngine,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            repo,
            engine,
            sink,
            clock,
            buddy_locks: BuddyLocks::new(),
            user_locks: BuddyLocks::new(),
            retry,
        }
    }

    pub fn engine(&self) -> &VitalsEngine {
        &self.engine
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create a buddy for the user, or return the one they already have
    ///
    /// The boolean is `true` when a new buddy was created.
    pub async fn create(
        &self,
        user_id: Uuid,
        name: String,
        image_url: Option<String>,
        timezone: Tz,
    ) -> Result<(BuddyVitals, bool), DomainError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation("buddy name must not be empty".to_string()));
        }

        let _guard = self.user_locks.acquire(user_id).await;

        if let Some(existing) = self.repo.find_by_user(user_id).await? {
            tracing::debug!("Buddy already exists for user {}: {}", user_id, existing.id);
            return Ok((existing, false));
        }

        let vitals = BuddyVitals::new(user_id, name, image_url, timezone, self.clock.now());
        let saved = self
            .with_retry("create", || self.repo.save(&vitals))
            .await?;

        tracing::info!("🐣 Created buddy: {} ({})", saved.name, saved.id);
        Ok((saved, true))
    }

    /// Current stored state, without applying decay
    pub async fn get(&self, id: Uuid) -> Result<BuddyVitals, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTITY, id))
    }

    pub async fn get_for_user(&self, user_id: Uuid) -> Result<BuddyVitals, DomainError> {
        self.repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: ENTITY.to_string(),
                id: format!("user {}", user_id),
            })
    }

    /// IDs of every stored buddy
    pub async fn list_ids(&self) -> Result<Vec<Uuid>, DomainError> {
        Ok(self.repo.find_all().await?.into_iter().map(|b| b.id).collect())
    }

    /// Apply the decay accrued since the last update
    pub async fn tick(&self, id: Uuid, force: bool) -> Result<VitalsUpdate, DomainError> {
        let committed = self
            .mutate(id, "tick", |engine, state, now| {
                let update = engine.apply_time_decay(state, now, force)?;
                Ok(Mutation {
                    persist: update.is_applied(),
                    next: update.vitals,
                    notifications: update.notifications,
                    output: update.outcome,
                })
            })
            .await?;

        if committed.output == UpdateOutcome::Applied {
            tracing::debug!(
                "⏱️  Tick {}: hp={} energy={}",
                id,
                committed.vitals.hp,
                committed.vitals.energy
            );
        }

        Ok(VitalsUpdate {
            vitals: committed.vitals,
            outcome: committed.output,
            notifications: committed.notifications,
        })
    }

    /// Feed the buddy; returns the new state and the nominal HP gain
    pub async fn feed(&self, id: Uuid, is_healthy: bool) -> Result<(BuddyVitals, i32), DomainError> {
        let committed = self
            .mutate(id, "feed", |engine, state, now| {
                user_event(engine, state, now, |decayed| {
                    Ok((
                        engine.feed(decayed, now, is_healthy)?,
                        engine.food_hp_gain(is_healthy),
                    ))
                })
            })
            .await?;

        tracing::info!(
            "🍽️  Fed buddy {} ({} food, +{} hp)",
            id,
            if is_healthy { "healthy" } else { "unhealthy" },
            committed.output
        );
        Ok((committed.vitals, committed.output))
    }

    pub async fn drink(&self, id: Uuid, cups: Cups) -> Result<BuddyVitals, DomainError> {
        let committed = self
            .mutate(id, "drink", |engine, state, now| {
                user_event(engine, state, now, |decayed| {
                    Ok((engine.drink(decayed, now, cups)?, ()))
                })
            })
            .await?;

        tracing::info!("💧 Buddy {} drank {}", id, cups);
        Ok(committed.vitals)
    }

    /// Put the buddy to sleep or wake it up
    pub async fn toggle_sleep(&self, id: Uuid) -> Result<SleepToggle, DomainError> {
        let committed = self
            .mutate(id, "toggle_sleep", |engine, state, now| {
                user_event(engine, state, now, |decayed| {
                    let toggle = engine.toggle_sleep(decayed, now)?;
                    Ok((toggle.vitals, toggle.transition))
                })
            })
            .await?;

        tracing::info!("😴 Buddy {} sleep toggled: {:?}", id, committed.output);
        Ok(SleepToggle {
            vitals: committed.vitals,
            transition: committed.output,
        })
    }

    /// Store the pedometer reading; steps never affect other vitals
    pub async fn record_steps(&self, id: Uuid, steps: i64) -> Result<BuddyVitals, DomainError> {
        let steps = i32::try_from(steps)
            .ok()
            .filter(|s| *s >= 0)
            .ok_or_else(|| {
                DomainError::Validation(format!("steps {} must be between 0 and {}", steps, i32::MAX))
            })?;

        let committed = self
            .mutate(id, "record_steps", |_, state, _| {
                Ok(Mutation {
                    persist: state.steps != steps,
                    next: BuddyVitals {
                        steps,
                        ..state.clone()
                    },
                    notifications: Vec::new(),
                    output: (),
                })
            })
            .await?;

        Ok(committed.vitals)
    }

    /// Keep the user's most recently updated buddy and delete the others
    pub async fn cleanup_duplicates(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let _guard = self.user_locks.acquire(user_id).await;
        let removed = self
            .with_retry("cleanup", || self.repo.remove_duplicates(user_id))
            .await?;

        if removed > 0 {
            tracing::info!("🧹 Removed {} duplicate buddies for user {}", removed, user_id);
        }
        Ok(removed)
    }

    /// Serialized load → compute → persist for one buddy, retried as a whole
    async fn mutate<T, F>(&self, id: Uuid, op: &str, compute: F) -> Result<Committed<T>, DomainError>
    where
        F: Fn(&VitalsEngine, &BuddyVitals, DateTime<Utc>) -> Result<Mutation<T>, DomainError>,
    {
        let committed = {
            let _guard = self.buddy_locks.acquire(id).await;
            let compute = &compute;
            self.with_retry(op, move || self.attempt(id, compute)).await?
        };

        self.dispatch(&committed.vitals, &committed.notifications);
        Ok(committed)
    }

    async fn attempt<T, F>(&self, id: Uuid, compute: &F) -> Result<Committed<T>, DomainError>
    where
        F: Fn(&VitalsEngine, &BuddyVitals, DateTime<Utc>) -> Result<Mutation<T>, DomainError>,
    {
        let current = self.get(id).await?;
        let now = self.clock.now();
        let mutation = compute(&self.engine, &current, now)?;

        let vitals = if mutation.persist {
            self.repo.save(&mutation.next).await?
        } else {
            mutation.next
        };

        Ok(Committed {
            vitals,
            notifications: mutation.notifications,
            output: mutation.output,
        })
    }

    async fn with_retry<T, F, Fut>(&self, op: &str, mut unit: F) -> Result<T, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match unit().await {
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        "⚠️  {} failed (attempt {}/{}), retrying in {:?}: {}",
                        op,
                        attempt,
                        max_attempts,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Best-effort delivery on a background task; failures are logged and swallowed
    fn dispatch(&self, vitals: &BuddyVitals, notifications: &[VitalsNotification]) {
        if notifications.is_empty() {
            return;
        }

        let sink = self.sink.clone();
        let vitals = vitals.clone();
        let notifications = notifications.to_vec();
        tokio::spawn(async move {
            for notification in &notifications {
                if let Err(e) = sink.notify(&vitals, notification).await {
                    tracing::warn!(
                        "⚠️  Failed to deliver {} notification for {}: {}",
                        notification.kind,
                        vitals.id,
                        e
                    );
                }
            }
        });
    }
}

/// Forced decay followed by the user's action, as one mutation
///
/// Low-vitals notifications from the decay are kept only if the action left
/// the vital low.
fn user_event<T>(
    engine: &VitalsEngine,
    state: &BuddyVitals,
    now: DateTime<Utc>,
    action: impl FnOnce(&BuddyVitals) -> Result<(BuddyVitals, T), DomainError>,
) -> Result<Mutation<T>, DomainError> {
    let decayed = engine.apply_time_decay(state, now, true)?;
    let (next, output) = action(&decayed.vitals)?;

    let threshold = engine.config().low_vitals_threshold;
    let notifications = decayed
        .notifications
        .into_iter()
        .filter(|n| match n.kind {
            NotificationKind::LowHp => next.hp <= threshold,
            NotificationKind::LowEnergy => next.energy <= threshold,
        })
        .collect();

    Ok(Mutation {
        next,
        persist: true,
        notifications,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryVitalsRepository, ManualClock, RecordingSink};
    use buddy::SleepTransition;
    use chrono::Duration as ChronoDuration;

    struct Harness {
        repo: Arc<InMemoryVitalsRepository>,
        sink: Arc<RecordingSink>,
        clock: Arc<ManualClock>,
        service: Arc<VitalsService<InMemoryVitalsRepository>>,
    }

    fn harness_with(sink: RecordingSink) -> Harness {
        let repo = Arc::new(InMemoryVitalsRepository::new());
        let sink = Arc::new(sink);
        let clock = Arc::new(ManualClock::morning());
        let retry = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        };
        let service = Arc::new(VitalsService::new(
            repo.clone(),
            VitalsEngine::default(),
            sink.clone(),
            clock.clone(),
            retry,
        ));
        Harness {
            repo,
            sink,
            clock,
            service,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingSink::new())
    }

    async fn create(h: &Harness) -> BuddyVitals {
        h.service
            .create(Uuid::new_v4(), "Mochi".to_string(), None, Tz::UTC)
            .await
            .unwrap()
            .0
    }

    async fn delivered(h: &Harness, count: usize) -> Vec<(Uuid, VitalsNotification)> {
        tokio::time::timeout(Duration::from_secs(5), h.sink.wait_for(count))
            .await
            .expect("notifications were not delivered")
    }

    #[test]
    fn test_retry_delay_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(300));
        assert_eq!(policy.delay_for(10), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_create_returns_existing_buddy() {
        let h = harness();
        let user_id = Uuid::new_v4();

        let (first, created) = h
            .service
            .create(user_id, "Mochi".to_string(), None, Tz::UTC)
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.hp, 100);
        assert_eq!(first.energy, 100);

        let (second, created) = h
            .service
            .create(user_id, "Other".to_string(), None, Tz::UTC)
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(h.repo.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_one_buddy() {
        let h = harness();
        let user_id = Uuid::new_v4();

        let tasks: Vec<_> = (0..5)
            .map(|i| {
                let service = h.service.clone();
                tokio::spawn(async move {
                    service
                        .create(user_id, format!("Mochi {}", i), None, Tz::UTC)
                        .await
                        .unwrap()
                        .0
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(h.repo.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let h = harness();
        let err = h
            .service
            .create(Uuid::new_v4(), "   ".to_string(), None, Tz::UTC)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_missing_buddy_is_not_found() {
        let h = harness();
        let err = h.service.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_tick_persists_applied_update() {
        let h = harness();
        let buddy = create(&h).await;

        h.clock.advance(ChronoDuration::hours(2));
        let update = h.service.tick(buddy.id, false).await.unwrap();

        assert_eq!(update.outcome, UpdateOutcome::Applied);
        assert_eq!(update.vitals.hp, 99);
        assert_eq!(h.repo.get(buddy.id).unwrap(), update.vitals);
    }

    #[tokio::test]
    async fn test_throttled_tick_does_not_save() {
        let h = harness();
        let buddy = create(&h).await;
        let saves = h.repo.save_count();

        h.clock.advance(ChronoDuration::seconds(30));
        let update = h.service.tick(buddy.id, false).await.unwrap();

        assert_eq!(update.outcome, UpdateOutcome::Throttled);
        assert_eq!(h.repo.save_count(), saves);
    }

    #[tokio::test]
    async fn test_drink_applies_pending_decay_first() {
        let h = harness();
        let buddy = create(&h).await;

        h.clock.advance(ChronoDuration::hours(2));
        let vitals = h.service.drink(buddy.id, Cups::new(3)).await.unwrap();

        // 2h at 0.5/h = -1, then +6
        assert_eq!(vitals.hp, 100);
        assert_eq!(vitals.water_consumed, 3);
        assert_eq!(vitals.last_drank, Some(h.clock.now()));
        assert_eq!(vitals.last_updated, h.clock.now());
    }

    #[tokio::test]
    async fn test_drink_after_midnight_starts_a_new_day() {
        let h = harness();
        let mut buddy = create(&h).await;
        buddy.water_consumed = 9;
        h.repo.insert(buddy.clone());

        h.clock.advance(ChronoDuration::hours(16));
        let vitals = h.service.drink(buddy.id, Cups::ONE).await.unwrap();

        assert_eq!(vitals.water_consumed, 1);
    }

    #[tokio::test]
    async fn test_sleep_round_trip_through_service() {
        let h = harness();
        let mut buddy = create(&h).await;
        buddy.energy = 50;
        h.repo.insert(buddy.clone());

        let asleep = h.service.toggle_sleep(buddy.id).await.unwrap();
        assert_eq!(asleep.transition, SleepTransition::FellAsleep);
        assert!(asleep.vitals.is_sleeping);

        h.clock.advance(ChronoDuration::hours(2));
        let awake = h.service.toggle_sleep(buddy.id).await.unwrap();

        assert_eq!(awake.transition, SleepTransition::WokeUp { hours_slept: 2.0 });
        assert_eq!(awake.vitals.energy, 70);
        assert!(!awake.vitals.is_sleeping);
        assert_eq!(awake.vitals.sleep_start_time, None);
        assert_eq!(awake.vitals.total_sleep_hours, 2.0);
    }

    #[tokio::test]
    async fn test_ticks_during_sleep_are_not_counted_twice() {
        let h = harness();
        let mut buddy = create(&h).await;
        buddy.energy = 50;
        h.repo.insert(buddy.clone());

        h.service.toggle_sleep(buddy.id).await.unwrap();
        for _ in 0..4 {
            h.clock.advance(ChronoDuration::minutes(30));
            h.service.tick(buddy.id, false).await.unwrap();
        }
        let awake = h.service.toggle_sleep(buddy.id).await.unwrap();

        assert_eq!(awake.vitals.energy, 70);
    }

    #[tokio::test]
    async fn test_feed_reports_gain() {
        let h = harness();
        let mut buddy = create(&h).await;
        buddy.hp = 90;
        h.repo.insert(buddy.clone());

        let (vitals, gain) = h.service.feed(buddy.id, true).await.unwrap();
        assert_eq!(vitals.hp, 100);
        assert_eq!(gain, 15);
        assert_eq!(vitals.last_fed, Some(h.clock.now()));
    }

    #[tokio::test]
    async fn test_transient_save_failure_retries_whole_unit() {
        let h = harness();
        let buddy = create(&h).await;

        h.clock.advance(ChronoDuration::hours(2));
        h.repo.fail_next_saves(2);
        let update = h.service.tick(buddy.id, false).await.unwrap();

        assert!(update.is_applied());
        assert_eq!(h.repo.get(buddy.id).unwrap().hp, 99);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_unavailable() {
        let h = harness();
        let buddy = create(&h).await;

        h.clock.advance(ChronoDuration::hours(2));
        h.repo.fail_next_saves(10);
        let err = h.service.tick(buddy.id, false).await.unwrap_err();

        assert!(matches!(err, DomainError::Unavailable(_)));
        assert_eq!(h.repo.get(buddy.id).unwrap().hp, 100);
    }

    #[tokio::test]
    async fn test_low_hp_notification_sent_once_per_update() {
        let h = harness();
        let mut buddy = create(&h).await;
        buddy.hp = 21;
        h.repo.insert(buddy.clone());

        h.clock.advance(ChronoDuration::hours(2));
        h.service.tick(buddy.id, false).await.unwrap();

        let sent = delivered(&h, 1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, buddy.id);
        assert_eq!(sent[0].1.kind, NotificationKind::LowHp);
    }

    #[tokio::test]
    async fn test_feeding_clears_stale_low_hp_notification() {
        let h = harness();
        let mut buddy = create(&h).await;
        buddy.hp = 21;
        h.repo.insert(buddy.clone());

        // decay alone would leave hp at 20
        h.clock.advance(ChronoDuration::hours(2));
        let (vitals, _) = h.service.feed(buddy.id, true).await.unwrap();

        assert_eq!(vitals.hp, 35);
        assert!(h.sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_update() {
        let h = harness_with(RecordingSink::failing());
        let mut buddy = create(&h).await;
        buddy.hp = 10;
        h.repo.insert(buddy.clone());

        h.clock.advance(ChronoDuration::hours(4));
        let update = h.service.tick(buddy.id, false).await.unwrap();

        assert!(update.is_applied());
        assert_eq!(delivered(&h, 1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_record_steps_validates_range() {
        let h = harness();
        let buddy = create(&h).await;

        let vitals = h.service.record_steps(buddy.id, 4200).await.unwrap();
        assert_eq!(vitals.steps, 4200);
        assert_eq!(vitals.hp, buddy.hp);

        let err = h.service.record_steps(buddy.id, -1).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_cleanup_keeps_most_recent_buddy() {
        let h = harness();
        let user_id = Uuid::new_v4();
        let now = h.clock.now();

        let old = BuddyVitals::new(user_id, "Old".to_string(), None, Tz::UTC, now - ChronoDuration::days(3));
        let recent = BuddyVitals::new(user_id, "Recent".to_string(), None, Tz::UTC, now);
        h.repo.insert(old.clone());
        h.repo.insert(recent.clone());

        let removed = h.service.cleanup_duplicates(user_id).await.unwrap();

        assert_eq!(removed, 1);
        assert!(h.repo.get(old.id).is_none());
        assert_eq!(h.service.get_for_user(user_id).await.unwrap().id, recent.id);
    }

    #[tokio::test]
    async fn test_concurrent_drinks_are_serialized() {
        let h = harness();
        let buddy = create(&h).await;

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let service = h.service.clone();
                tokio::spawn(async move { service.drink(buddy.id, Cups::ONE).await.unwrap() })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(h.repo.get(buddy.id).unwrap().water_consumed, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_sink_does_not_delay_the_update() {
        let h = harness_with(RecordingSink::slow(Duration::from_secs(30)));
        let mut buddy = create(&h).await;
        buddy.hp = 10;
        h.repo.insert(buddy.clone());

        h.clock.advance(ChronoDuration::hours(2));
        let started = tokio::time::Instant::now();
        let vitals = h.service.drink(buddy.id, Cups::ONE).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(vitals.hp, 11);
        assert!(h.sink.sent().is_empty());

        let sent = h.sink.wait_for(1).await;
        assert_eq!(sent[0].1.kind, NotificationKind::LowHp);
    }

    #[tokio::test]
    async fn test_lock_entries_do_not_outlive_operations() {
        let h = harness();
        let buddy = create(&h).await;

        for _ in 0..50 {
            let err = h.service.tick(Uuid::new_v4(), false).await.unwrap_err();
            assert!(matches!(err, DomainError::NotFound { .. }));
            h.service.cleanup_duplicates(Uuid::new_v4()).await.unwrap();
        }
        h.service.drink(buddy.id, Cups::ONE).await.unwrap();
        h.service
            .create(Uuid::new_v4(), "Tofu".to_string(), None, Tz::UTC)
            .await
            .unwrap();

        assert_eq!(h.service.buddy_locks.len(), 0);
        assert_eq!(h.service.user_locks.len(), 0);
    }
}
