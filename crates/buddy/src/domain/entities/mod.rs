//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - BuddyVitals: The buddy's vital signs
//! - VitalsNotification: Low-vitals alerts
//! - FoodAnalysis / FoodEntry: Classified meals and the food journal

mod food;
mod notification;
mod vitals;

pub use food::*;
pub use notification::*;
pub use vitals::*;
