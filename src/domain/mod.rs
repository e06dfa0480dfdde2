//! Domain layer for the logging facade
//!
//! This module contains the level, record and configuration models and the
//! sink port.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{LogError, LogResult};
