//! Akatsuki CLI entry point.

use clap::{CommandFactory, Parser};

use akatsuki::cli::{commands, handle_error, Cli};
use akatsuki::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.task.is_none() && !cli.is_informational() {
        // help is best effort; the exit status carries the failure
        let _ = Cli::command().print_help();
        std::process::exit(1);
    }

    let config = match commands::load_config(&cli) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    if let Err(err) = commands::execute(&cli, &config).await {
        handle_error(err, cli.json);
    }
}
