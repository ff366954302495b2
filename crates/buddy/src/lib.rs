//! Buddy Domain Library
//!
//! Core domain types and interfaces for the virtual buddy simulation.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (BuddyVitals, VitalsNotification, FoodEntry)
//!   - `value_objects/`: Immutable value types (Cups, SleepPhase, calendar days)
//!   - `services/`: The vitals engine and food scoring
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service interfaces (classifier, notifications, clock)
//!
//! # Usage
//!
//! ```rust,ignore
//! use buddy::{BuddyVitals, VitalsEngine};
//!
//! let engine = VitalsEngine::default();
//! let update = engine.apply_time_decay(&vitals, now, false)?;
//! if update.is_applied() {
//!     repo.save(&update.vitals).await?;
//! }
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    calendar_day_of, BuddyVitals, Cups, DomainError, FoodAnalysis, FoodEntry, HealthScorer,
    NotificationKind, SleepPhase, SleepToggle, SleepTransition, UpdateOutcome, VitalsConfig,
    VitalsEngine, VitalsNotification, VitalsUpdate,
};
pub use ports::{
    Clock, FoodClassifier, FoodJournalRepository, NotificationSink, SystemClock,
    VitalsRepository,
};
