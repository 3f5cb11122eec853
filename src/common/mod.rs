//! Shared types, errors and test helpers

pub mod errors;
pub mod speedtest;
pub mod types;
