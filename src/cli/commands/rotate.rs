//! Implementation of the `teelog rotate` command.

use anyhow::{Context, Result};
use console::style;

use crate::domain::models::LoggerConfig;
use crate::infrastructure::logging::{RotatingFile, RotationPolicy};

pub fn execute(config: &LoggerConfig) -> Result<()> {
    let path = config
        .file
        .as_ref()
        .context("No log file configured, use --file or set `file` in the config")?;
    let policy = RotationPolicy::from(&config.rotation);

    let mut file = RotatingFile::new(path, policy);
    file.rotate()
        .with_context(|| format!("Failed to rotate {}", path.display()))?;
    // Waits for the background prune/compress pass
    drop(file);

    let backups = RotatingFile::new(path, policy)
        .backups()
        .with_context(|| format!("Failed to list backups of {}", path.display()))?;

    println!(
        "{} {}",
        style("rotated").green().bold(),
        style(path.display()).bold()
    );
    for backup in &backups {
        println!("  {}", backup.display());
    }
    Ok(())
}
