//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::emit::EmitArgs;
use super::commands::fatal::FatalArgs;
use super::commands::pipe::PipeArgs;
use crate::domain::models::{Level, LoggerConfig};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LogFlags;

#[derive(Parser, Debug)]
#[command(name = "teelog")]
#[command(about = "Write structured records to the console and a rotating JSON log file", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub log: LogFlags,

    /// Config file (defaults to ./teelog.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Rotating log file
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Minimum level written
    #[arg(long = "min-level", global = true)]
    pub min_level: Option<Level>,

    /// Disable colors on the console
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Write to the log file only
    #[arg(long, global = true)]
    pub no_console: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one record
    Emit(EmitArgs),

    /// Write one record per line read from stdin
    Pipe(PipeArgs),

    /// Rotate the log file now and prune old backups
    Rotate,

    /// Write a fatal record and exit with code 1
    Fatal(FatalArgs),

    /// Print the effective configuration as YAML
    Config,
}

impl Cli {
    /// Effective configuration: file and environment, then command-line overrides
    pub fn resolve_config(&self) -> Result<LoggerConfig> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };

        if let Some(file) = &self.file {
            config.file = Some(file.clone());
        }
        if let Some(level) = self.min_level {
            config.level = level;
        }
        if self.log.debug {
            config.debug = true;
        }
        if self.no_color {
            config.console.color = false;
        }
        if self.no_console {
            config.console.enabled = false;
        }

        ConfigLoader::validate(&config)?;
        Ok(config)
    }
}
