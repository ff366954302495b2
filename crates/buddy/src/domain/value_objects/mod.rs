//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod calendar_day;
mod cups;
mod sleep_phase;

pub use calendar_day::*;
pub use cups::*;
pub use sleep_phase::*;
