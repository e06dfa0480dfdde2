//! Infrastructure layer module
//!
//! Implementations of the domain's [`Sink`](crate::domain::ports::Sink) port
//! and everything around them:
//! - Logger front end, sinks and file rotation
//! - Configuration management

pub mod config;
pub mod logging;
