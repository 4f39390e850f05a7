mod cli;
mod commands;
mod error;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use marquee_core::config::AppConfig;

use crate::cli::{Cli, Command, ConfigAction};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config init` must work even when the existing file does not parse.
    let config = match (&cli.command, &cli.config) {
        (
            Command::Config {
                action: ConfigAction::Init { .. },
            },
            _,
        ) => AppConfig::default(),
        (_, Some(path)) => AppConfig::load_from(path)?,
        (_, None) => AppConfig::load()?,
    };
    commands::run(cli.command, &config, cli.config.as_deref()).await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "marquee=debug" } else { "marquee=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
