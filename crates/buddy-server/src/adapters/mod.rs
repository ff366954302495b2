//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod clarifai;
pub mod log;
#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod webhook;

// Re-exports
pub use clarifai::ClarifaiClassifier;
pub use log::TracingNotificationSink;
pub use postgres::{PgFoodJournalRepository, PgVitalsRepository};
pub use webhook::WebhookNotificationSink;
