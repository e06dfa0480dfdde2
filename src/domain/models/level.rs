use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::LogError;

/// Severity of a log record.
///
/// Levels are ordered from most verbose (`Debug`) to `Disabled`. A logger
/// with minimum level `L` emits every record whose level is `>= L`, except
/// that nothing is emitted at or under `Disabled`.
///
/// # Examples
///
/// ```
/// use teelog::Level;
///
/// assert!(Level::Error > Level::Info);
/// assert!(Level::Warn.is_enabled_by(Level::Info));
/// assert!(!Level::Debug.is_enabled_by(Level::Info));
/// assert!(!Level::Error.is_enabled_by(Level::Disabled));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    /// Diagnostic detail, off unless `--debug` is given
    Debug = 0,
    /// Normal operation
    #[default]
    Info = 1,
    /// Something unexpected that the process recovered from
    Warn = 2,
    /// An operation failed
    Error = 3,
    /// The record is written, then the process exits with code 1
    Fatal = 4,
    /// The record is written, then the calling thread panics
    Panic = 5,
    /// Records without a severity; emitted unless logging is disabled
    #[serde(alias = "")]
    NoLevel = 6,
    /// Suppresses every record
    Disabled = 7,
}

impl Level {
    /// Every level, in ascending order.
    pub const ALL: [Self; 8] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
        Self::Panic,
        Self::NoLevel,
        Self::Disabled,
    ];

    /// Name written into the `level` field of structured records.
    ///
    /// `NoLevel` has an empty name; records at that level carry no `level` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
            Self::NoLevel => "",
            Self::Disabled => "disabled",
        }
    }

    /// Three-letter tag used by the console format.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Debug => "DBG",
            Self::Info => "INF",
            Self::Warn => "WRN",
            Self::Error => "ERR",
            Self::Fatal => "FTL",
            Self::Panic => "PNC",
            Self::NoLevel | Self::Disabled => "???",
        }
    }

    /// Whether a record at this level passes a logger whose minimum is `minimum`.
    pub fn is_enabled_by(self, minimum: Self) -> bool {
        minimum != Self::Disabled && self != Self::Disabled && self >= minimum
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Debug,
            1 => Self::Info,
            2 => Self::Warn,
            3 => Self::Error,
            4 => Self::Fatal,
            5 => Self::Panic,
            6 => Self::NoLevel,
            _ => Self::Disabled,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "panic" => Ok(Self::Panic),
            "" | "nolevel" => Ok(Self::NoLevel),
            "disabled" => Ok(Self::Disabled),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}
