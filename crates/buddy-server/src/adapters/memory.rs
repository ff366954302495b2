//! In-memory adapters used by the service and scheduler tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use buddy::{
    BuddyVitals, Clock, DomainError, FoodAnalysis, FoodClassifier, FoodEntry,
    FoodJournalRepository, NotificationSink, VitalsNotification, VitalsRepository,
};

/// Vitals store with injectable transient save failures
#[derive(Default)]
pub struct InMemoryVitalsRepository {
    buddies: Mutex<HashMap<Uuid, BuddyVitals>>,
    failing_saves: AtomicUsize,
    saves: AtomicUsize,
}

impl InMemoryVitalsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, vitals: BuddyVitals) {
        self.buddies.lock().unwrap().insert(vitals.id, vitals);
    }

    pub fn get(&self, id: Uuid) -> Option<BuddyVitals> {
        self.buddies.lock().unwrap().get(&id).cloned()
    }

    pub fn remove(&self, id: Uuid) {
        self.buddies.lock().unwrap().remove(&id);
    }

    pub fn len(&self) -> usize {
        self.buddies.lock().unwrap().len()
    }

    /// The next `count` saves fail with `DomainError::Unavailable`
    pub fn fail_next_saves(&self, count: usize) {
        self.failing_saves.store(count, Ordering::SeqCst);
    }

    /// Successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VitalsRepository for InMemoryVitalsRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BuddyVitals>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<BuddyVitals>, DomainError> {
        Ok(self
            .buddies
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.user_id == user_id)
            .max_by_key(|b| b.last_updated)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<BuddyVitals>, DomainError> {
        Ok(self.buddies.lock().unwrap().values().cloned().collect())
    }

    async fn save(&self, vitals: &BuddyVitals) -> Result<BuddyVitals, DomainError> {
        let pending = self.failing_saves.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_saves.store(pending - 1, Ordering::SeqCst);
            return Err(DomainError::Unavailable("connection reset".to_string()));
        }
        self.insert(vitals.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(vitals.clone())
    }

    async fn remove_duplicates(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let keep = self.find_by_user(user_id).await?.map(|b| b.id);
        let mut buddies = self.buddies.lock().unwrap();
        let before = buddies.len();
        buddies.retain(|id, b| b.user_id != user_id || Some(*id) == keep);
        Ok(before - buddies.len())
    }
}

#[derive(Default)]
pub struct InMemoryFoodJournal {
    entries: Mutex<Vec<FoodEntry>>,
}

impl InMemoryFoodJournal {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FoodJournalRepository for InMemoryFoodJournal {
    async fn add(&self, entry: &FoodEntry) -> Result<FoodEntry, DomainError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry.clone())
    }

    async fn list(&self, buddy_id: Uuid, limit: usize) -> Result<Vec<FoodEntry>, DomainError> {
        let mut entries: Vec<FoodEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.buddy_id == buddy_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.eaten_at.cmp(&a.eaten_at));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn clear(&self, buddy_id: Uuid) -> Result<usize, DomainError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.buddy_id != buddy_id);
        Ok(before - entries.len())
    }
}

/// Sink that remembers every notification it was given
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(Uuid, VitalsNotification)>>,
    delivered: Notify,
    fail: bool,
    delay: Option<std::time::Duration>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose deliveries always fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// A sink that takes `delay` to deliver each notification
    pub fn slow(delay: std::time::Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(Uuid, VitalsNotification)> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait until at least `count` notifications have arrived
    pub async fn wait_for(&self, count: usize) -> Vec<(Uuid, VitalsNotification)> {
        loop {
            let delivered = self.delivered.notified();
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            delivered.await;
        }
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(
        &self,
        vitals: &BuddyVitals,
        notification: &VitalsNotification,
    ) -> Result<(), DomainError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.sent
            .lock()
            .unwrap()
            .push((vitals.id, notification.clone()));
        self.delivered.notify_waiters();
        if self.fail {
            return Err(DomainError::ExternalService("webhook down".to_string()));
        }
        Ok(())
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 2024-03-10 09:00 UTC
    pub fn morning() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Classifier returning a canned analysis, or failing when none is set
pub struct StaticClassifier {
    analysis: Option<FoodAnalysis>,
}

impl StaticClassifier {
    pub fn returning(analysis: FoodAnalysis) -> Self {
        Self {
            analysis: Some(analysis),
        }
    }

    pub fn failing() -> Self {
        Self { analysis: None }
    }
}

#[async_trait]
impl FoodClassifier for StaticClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<FoodAnalysis, DomainError> {
        self.analysis
            .clone()
            .ok_or_else(|| DomainError::ExternalService("classifier returned 500".to_string()))
    }
}
