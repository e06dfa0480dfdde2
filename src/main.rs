//! teelog CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use teelog::cli::{commands, handle_error, Cli, Commands};
use teelog::Logger;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(err) => handle_error(err),
    };

    let result = match cli.command {
        Commands::Config => commands::config::execute(&config),
        Commands::Rotate => commands::rotate::execute(&config),
        Commands::Emit(args) => commands::emit::execute(args, &Logger::from_config(&config)),
        Commands::Pipe(args) => {
            commands::pipe::execute(args, &Logger::from_config(&config)).await
        }
        Commands::Fatal(args) => {
            commands::fatal::execute(args, &Logger::from_config(&config));
            Ok(())
        }
    };

    if let Err(err) = result {
        handle_error(err);
    }
}
