//! Implementation of the `teelog fatal` command.

use clap::Args;

use crate::infrastructure::logging::Logger;

#[derive(Args, Debug)]
pub struct FatalArgs {
    /// Message words, joined with spaces
    #[arg(required = true)]
    pub message: Vec<String>,
}

/// Write the record, flush and exit with code 1
pub fn execute(args: FatalArgs, logger: &Logger) {
    logger.fatalf(format_args!("{}", args.message.join(" ")));
}
