use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::LoggerConfig;
use crate::infrastructure::logging::is_valid_time_format;

/// Config file read by [`ConfigLoader::load`], relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "teelog.yaml";

/// Prefix of environment overrides; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "TEELOG_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_size_mb: {0}. Must be at least 1")]
    InvalidMaxSize(u64),

    #[error("Invalid time_format: {0:?}")]
    InvalidTimeFormat(String),

    #[error("Log file path cannot be empty")]
    EmptyFilePath,

    #[error("Console and file output are both disabled")]
    NoOutput,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `teelog.yaml` in the working directory (optional)
    /// 3. Environment variables (`TEELOG_*`, e.g. `TEELOG_ROTATION__MAX_BACKUPS=3`)
    pub fn load() -> Result<LoggerConfig> {
        let config: LoggerConfig = Figment::new()
            .merge(Serialized::defaults(LoggerConfig::default()))
            .merge(Yaml::file(DEFAULT_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<LoggerConfig> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: LoggerConfig = Figment::new()
            .merge(Serialized::defaults(LoggerConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &LoggerConfig) -> Result<(), ConfigError> {
        if config.rotation.max_size_mb == 0 {
            return Err(ConfigError::InvalidMaxSize(config.rotation.max_size_mb));
        }

        if !is_valid_time_format(&config.time_format) {
            return Err(ConfigError::InvalidTimeFormat(config.time_format.clone()));
        }

        if let Some(file) = &config.file {
            if file.as_os_str().is_empty() {
                return Err(ConfigError::EmptyFilePath);
            }
        }

        if !config.console.enabled && config.file.is_none() {
            return Err(ConfigError::NoOutput);
        }

        Ok(())
    }
}
