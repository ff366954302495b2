//! Service Ports
//!
//! Abstract interfaces for external services.

mod clock;
mod food_classifier;
mod notification_sink;

pub use clock::*;
pub use food_classifier::*;
pub use notification_sink::*;
