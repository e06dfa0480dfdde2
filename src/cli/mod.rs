//! Command-line interface for the `teelog` binary.

pub mod commands;
pub mod types;

pub use types::{Cli, Commands};

use console::style;

/// Exit code for configuration and I/O failures
pub const ERROR_EXIT_CODE: i32 = 2;

/// Print `err` with its causes on stderr and exit
pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {err:#}", style("error:").red().bold());
    std::process::exit(ERROR_EXIT_CODE)
}
