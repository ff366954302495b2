//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod food_journal_repository;
mod vitals_repository;

pub use food_journal_repository::*;
pub use vitals_repository::*;
