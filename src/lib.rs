//! Library entrypoint for the notification log schema setup.
//!
//! The binary in `main.rs` is thin wiring; everything it runs lives here so
//! integration tests under `tests/` can drive it against a test double.

pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod services;

#[path = "views/report.rs"]
pub mod report;

pub use error::{Result, SetupError};
