//! Domain errors for the logging facade.
//!
//! None of these reach callers of the logging methods; they travel between
//! the rotating file, the sinks and configuration code.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid log level: {0}. Must be one of: debug, info, warn, error, fatal, panic, nolevel, disabled")]
    InvalidLevel(String),

    #[error("Write length {len} exceeds maximum file size {max}")]
    WriteTooLarge { len: usize, max: u64 },

    #[error("Log file path has no file name: {0}")]
    InvalidFilePath(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type LogResult<T> = Result<T, LogError>;

impl From<LogError> for io::Error {
    fn from(err: LogError) -> Self {
        match err {
            LogError::Io(err) => err,
            other => Self::other(other),
        }
    }
}
