//! API request/response models
//!
//! DTOs with OpenAPI schemas. Domain types live in the `buddy` crate.

mod food;
mod vitals;

pub use food::*;
pub use vitals::*;
