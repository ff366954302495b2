//! Background services

pub mod scheduler;
