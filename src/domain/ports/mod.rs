//! Port trait definitions (Hexagonal Architecture)
//!
//! - Sink: destination for finalized log records
//!
//! The logger depends only on this trait, so console, file and test
//! destinations can be combined freely.

pub mod sink;

pub use sink::Sink;
