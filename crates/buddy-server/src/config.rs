//! Server configuration read from Shuttle secrets

use std::str::FromStr;
use std::time::Duration;

use buddy::VitalsConfig;

use crate::application::RetryPolicy;
use crate::services::scheduler::TickerConfig;

/// Everything the server reads from its secret store
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub api_key: Option<String>,
    pub ticker: TickerConfig,
    pub retry: RetryPolicy,
    pub vitals: VitalsConfig,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub clarifai_pat: Option<String>,
}

impl ServerConfig {
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }

    /// Build from any key/value source; missing or invalid values keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        config.api_key = text("BUDDY_API_KEY");
        config.webhook_url = text("NOTIFY_WEBHOOK_URL");
        config.webhook_secret = text("NOTIFY_WEBHOOK_SECRET");
        config.clarifai_pat = text("CLARIFAI_PAT");

        if let Some(secs) = parsed::<u64>(&text, "TICK_INTERVAL_SECS").filter(|s| *s > 0) {
            config.ticker.interval = Duration::from_secs(secs);
        }
        if let Some(enabled) = parsed::<bool>(&text, "TICKER_ENABLED") {
            config.ticker.enabled = enabled;
        }
        if let Some(attempts) = parsed::<u32>(&text, "PERSIST_MAX_ATTEMPTS").filter(|a| *a > 0) {
            config.retry.max_attempts = attempts;
        }
        if let Some(ms) = parsed::<u64>(&text, "PERSIST_RETRY_BASE_MS") {
            config.retry.base_delay = Duration::from_millis(ms);
        }
        if let Some(cups) = parsed::<i32>(&text, "WATER_GOAL_CUPS").filter(|c| *c > 0) {
            config.vitals.water_goal_cups = cups;
        }

        config
    }
}

fn parsed<T: FromStr>(text: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = text(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("⚠️  Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
