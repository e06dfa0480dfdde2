use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::level::Level;

/// Timestamp pattern applied to every record: `YYYY-MM-DD HH:mm:ss.SSS`.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Main configuration structure for a logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggerConfig {
    /// Rotating log file; `None` logs to the console only
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Minimum level
    #[serde(default)]
    pub level: Level,

    /// Lowers the minimum level to `debug`
    #[serde(default)]
    pub debug: bool,

    /// strftime pattern for the `time` field
    #[serde(default = "default_time_format")]
    pub time_format: String,

    /// Console output
    #[serde(default)]
    pub console: ConsoleConfig,

    /// File rotation policy
    #[serde(default)]
    pub rotation: RotationConfig,
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

impl LoggerConfig {
    /// Minimum level after applying the `debug` switch
    pub fn effective_level(&self) -> Level {
        if self.debug {
            Level::Debug
        } else {
            self.level
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: Level::Info,
            debug: false,
            time_format: default_time_format(),
            console: ConsoleConfig::default(),
            rotation: RotationConfig::default(),
        }
    }
}

/// Console output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConsoleConfig {
    /// Write records to stdout
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Colorize level tags, timestamps and field names
    #[serde(default = "default_true")]
    pub color: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: true,
        }
    }
}

/// Rotation policy for the log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RotationConfig {
    /// Size in megabytes at which the file is rotated
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,

    /// Rotated files to keep (0 keeps all)
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,

    /// Days to keep rotated files (0 keeps them forever)
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,

    /// Gzip rotated files
    #[serde(default = "default_true")]
    pub compress: bool,

    /// Stamp backup names with local time instead of UTC
    #[serde(default)]
    pub local_time: bool,
}

const fn default_max_size_mb() -> u64 {
    100
}

const fn default_max_backups() -> usize {
    7
}

const fn default_max_age_days() -> u64 {
    30
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_size_mb: default_max_size_mb(),
            max_backups: default_max_backups(),
            max_age_days: default_max_age_days(),
            compress: true,
            local_time: false,
        }
    }
}
