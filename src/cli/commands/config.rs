//! Implementation of the `teelog config` command.

use anyhow::{Context, Result};

use crate::domain::models::LoggerConfig;

pub fn execute(config: &LoggerConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    print!("{yaml}");
    Ok(())
}
