//! Vitals Ticker - Periodic decay for active buddies
//!
//! One background task per active buddy. Each task runs a forced update when
//! it starts, then an unforced update every interval until it is stopped, the
//! server shuts down, or the buddy disappears.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

use buddy::{DomainError, VitalsRepository};

use crate::application::VitalsService;

/// Ticker configuration
#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Interval between unforced updates
    pub interval: Duration,
    /// Enable/disable periodic ticks
    pub enabled: bool,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            enabled: true,
        }
    }
}

struct RunningTicker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Registry of per-buddy tick tasks
pub struct VitalsTicker<R: VitalsRepository + 'static> {
    service: Arc<VitalsService<R>>,
    config: TickerConfig,
    tickers: Mutex<HashMap<Uuid, RunningTicker>>,
}

impl<R: VitalsRepository + 'static> VitalsTicker<R> {
    pub fn new(service: Arc<VitalsService<R>>, config: Option<TickerConfig>) -> Self {
        Self {
            service,
            config: config.unwrap_or_default(),
            tickers: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// Start ticking `id`; false when disabled or already running
    pub fn start(&self, id: Uuid) -> bool {
        if !self.config.enabled {
            return false;
        }

        let mut tickers = self.tickers.lock().unwrap_or_else(|e| e.into_inner());
        if tickers.get(&id).is_some_and(|t| !t.handle.is_finished()) {
            return false;
        }

        let (shutdown, rx) = oneshot::channel();
        let handle = tokio::spawn(run(self.service.clone(), id, self.config.interval, rx));
        tickers.insert(id, RunningTicker { shutdown, handle });

        tracing::info!("⏰ Ticker started for buddy {}", id);
        true
    }

    /// Stop ticking `id` and wait for the task to finish
    pub async fn stop(&self, id: Uuid) -> bool {
        let ticker = self
            .tickers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);

        match ticker {
            Some(ticker) => {
                let was_running = !ticker.handle.is_finished();
                shutdown(ticker).await;
                tracing::info!("⏹️  Ticker stopped for buddy {}", id);
                was_running
            }
            None => false,
        }
    }

    /// Stop every ticker (server shutdown)
    pub async fn stop_all(&self) {
        let tickers: Vec<RunningTicker> = self
            .tickers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain()
            .map(|(_, t)| t)
            .collect();

        let count = tickers.len();
        for ticker in tickers {
            shutdown(ticker).await;
        }
        tracing::info!("⏹️  Stopped {} tickers", count);
    }

    pub fn is_running(&self, id: Uuid) -> bool {
        self.tickers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .is_some_and(|t| !t.handle.is_finished())
    }

    pub fn active_count(&self) -> usize {
        self.tickers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|t| !t.handle.is_finished())
            .count()
    }
}

async fn shutdown(ticker: RunningTicker) {
    // The task may already have exited on its own
    let _ = ticker.shutdown.send(());
    if let Err(e) = ticker.handle.await {
        tracing::warn!("⚠️  Ticker task ended abnormally: {}", e);
    }
}

/// Tick loop for one buddy
async fn run<R: VitalsRepository + 'static>(
    service: Arc<VitalsService<R>>,
    id: Uuid,
    period: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    if tick_once(&service, id, true).await {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if !tick_once(&service, id, false).await {
                        break;
                    }
                }
            }
        }
    }
}

/// Returns false when the ticker should stop
async fn tick_once<R: VitalsRepository>(service: &VitalsService<R>, id: Uuid, force: bool) -> bool {
    match service.tick(id, force).await {
        Ok(_) => true,
        Err(DomainError::NotFound { .. }) => {
            tracing::info!("👋 Buddy {} no longer exists - ticker exiting", id);
            false
        }
        Err(e) => {
            tracing::warn!("⚠️  Tick failed for buddy {}: {}", id, e);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryVitalsRepository, ManualClock, RecordingSink};
    use crate::application::RetryPolicy;
    use buddy::{BuddyVitals, Clock, VitalsEngine};
    use chrono_tz::Tz;

    struct Harness {
        repo: Arc<InMemoryVitalsRepository>,
        clock: Arc<ManualClock>,
        ticker: VitalsTicker<InMemoryVitalsRepository>,
    }

    fn harness(config: TickerConfig) -> Harness {
        let repo = Arc::new(InMemoryVitalsRepository::new());
        let clock = Arc::new(ManualClock::morning());
        let service = Arc::new(VitalsService::new(
            repo.clone(),
            VitalsEngine::default(),
            Arc::new(RecordingSink::new()),
            clock.clone(),
            RetryPolicy::default(),
        ));
        Harness {
            repo,
            clock,
            ticker: VitalsTicker::new(service, Some(config)),
        }
    }

    /// A buddy whose last update was two hours before the clock
    fn stale_buddy(h: &Harness) -> BuddyVitals {
        let created = h.clock.now() - chrono::Duration::hours(2);
        let buddy = BuddyVitals::new(Uuid::new_v4(), "Mochi".to_string(), None, Tz::UTC, created);
        h.repo.insert(buddy.clone());
        buddy
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_tick_is_forced_then_periodic() {
        let h = harness(TickerConfig::default());
        let buddy = stale_buddy(&h);

        assert!(h.ticker.start(buddy.id));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(h.repo.save_count(), 1);
        assert_eq!(h.repo.get(buddy.id).unwrap().hp, 99);

        h.clock.advance(chrono::Duration::hours(2));
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(h.repo.save_count(), 2);
        assert_eq!(h.repo.get(buddy.id).unwrap().hp, 98);
        assert!(h.ticker.stop(buddy.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_ticks_do_not_save() {
        let h = harness(TickerConfig::default());
        let buddy = stale_buddy(&h);

        h.ticker.start(buddy.id);
        tokio::time::sleep(Duration::from_secs(600)).await;

        // The manual clock never moved, so every periodic tick was throttled
        assert_eq!(h.repo.save_count(), 1);
        h.ticker.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent_and_stop_is_clean() {
        let h = harness(TickerConfig::default());
        let buddy = stale_buddy(&h);

        assert!(h.ticker.start(buddy.id));
        assert!(!h.ticker.start(buddy.id));
        assert_eq!(h.ticker.active_count(), 1);

        assert!(h.ticker.stop(buddy.id).await);
        assert!(!h.ticker.is_running(buddy.id));
        assert_eq!(h.ticker.active_count(), 0);
        assert!(!h.ticker.stop(buddy.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_exits_when_buddy_disappears() {
        let h = harness(TickerConfig::default());
        let buddy = stale_buddy(&h);

        h.ticker.start(buddy.id);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(h.ticker.is_running(buddy.id));

        h.repo.remove(buddy.id);
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert!(!h.ticker.is_running(buddy.id));
        assert_eq!(h.ticker.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_stops_every_ticker() {
        let h = harness(TickerConfig::default());
        let ids: Vec<Uuid> = (0..3).map(|_| stale_buddy(&h).id).collect();

        for id in &ids {
            h.ticker.start(*id);
        }
        assert_eq!(h.ticker.active_count(), 3);

        h.ticker.stop_all().await;
        assert_eq!(h.ticker.active_count(), 0);
    }

    #[tokio::test]
    async fn test_disabled_ticker_never_starts() {
        let h = harness(TickerConfig {
            enabled: false,
            ..TickerConfig::default()
        });
        let buddy = stale_buddy(&h);

        assert!(!h.ticker.start(buddy.id));
        assert_eq!(h.ticker.active_count(), 0);
    }
}
