//! teelog - structured leveled logging to the console and a rotating file
//!
//! Every record is written twice: as a colored line on stdout and as one JSON
//! object per line in a size-rotated log file whose old backups are pruned
//! and gzipped in the background.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): Levels, records, configuration and the `Sink` port
//! - **Infrastructure Layer** (`infrastructure`): Logger, sinks, rotation and config loading
//! - **CLI Layer** (`cli`): Command-line interface of the `teelog` binary
//!
//! # Example
//!
//! ```no_run
//! use teelog::{infof, Logger};
//!
//! // Honors `--debug` on the process command line
//! let logger = Logger::init("logs/app.log");
//!
//! logger.info().str("listener", "0.0.0.0:8080").msg("server started");
//! infof!(logger, "{} workers ready", 4);
//! logger.debug().msg("only written with --debug");
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{
    ConsoleConfig, FieldValue, Level, LoggerConfig, Record, RotationConfig, DEFAULT_TIME_FORMAT,
};
pub use domain::ports::Sink;
pub use domain::{LogError, LogResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::{
    ConsoleSink, Event, FanOut, JsonSink, LogFlags, Logger, LoggerBuilder, RotatingFile,
    RotationPolicy,
};
