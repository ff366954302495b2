//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod buddy_locks;
mod food_service;
mod vitals_service;

pub use buddy_locks::BuddyLocks;
pub use food_service::FoodService;
pub use vitals_service::{RetryPolicy, VitalsService};
