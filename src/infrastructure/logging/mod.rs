//! Logging infrastructure
//!
//! Records are built with an [`Event`] and delivered to every sink of a
//! [`Logger`]:
//! - [`ConsoleSink`]: human-readable lines on stdout, colored by level
//! - [`JsonSink`]: one JSON object per line, usually over a [`RotatingFile`]
//!
//! [`RotatingFile`] rotates by size and prunes old backups on a background
//! thread.

pub mod console;
pub mod event;
pub mod fanout;
pub mod flags;
pub mod format;
pub mod json;
pub mod logger;
mod macros;
pub mod rotation;

pub use console::ConsoleSink;
pub use event::Event;
pub use fanout::FanOut;
pub use flags::LogFlags;
pub use format::{is_valid_time_format, render_console, render_json};
pub use json::JsonSink;
pub use logger::{Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use rotation::{CleanupReport, RotatingFile, RotationPolicy};
