//! scrolldir Common Utilities
//!
//! Shared infrastructure for all scrolldir crates:
//! - Error types and result aliases
//! - Page and frame clocks for scroll timestamps
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
