//! Domain Services
//!
//! Stateless domain logic operating on entities.

pub mod food_scoring;
pub mod vitals_engine;

pub use food_scoring::HealthScorer;
pub use vitals_engine::{
    SleepToggle, SleepTransition, UpdateOutcome, VitalsConfig, VitalsEngine, VitalsUpdate,
};
