//! CLI command implementations.

pub mod config;
pub mod emit;
pub mod fatal;
pub mod pipe;
pub mod rotate;
