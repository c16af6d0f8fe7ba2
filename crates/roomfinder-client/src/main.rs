//! roomfinder CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use roomfinder_client::cli::{Cli, Command, ConfigAction};
use roomfinder_client::commands::{self, Session};
use roomfinder_client::config::ClientConfig;
use roomfinder_client::error::{ClientError, ClientResult};
use roomfinder_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tracing = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing) {
        eprintln!("warning: {}", e);
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    let loaded = match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    };
    loaded.map_err(ClientError::Config)
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);

    // Config commands work without a token.
    let command = match cli.command {
        Command::Config { action } => {
            return match action {
                ConfigAction::Dump => commands::config::dump(&config, &config_path),
                ConfigAction::Validate => commands::config::validate(&config),
                ConfigAction::Path => commands::config::path(&config_path),
            };
        }
        command => command,
    };

    let session = Session::open(config, cli.token.as_deref(), cli.timezone.as_deref())?;

    match command {
        Command::Find(args) => commands::find::run(&session, args).await,
        Command::Book(args) => commands::book::run(&session, args).await,
        Command::Schedule(args) => commands::schedule::run(&session, args).await,
        Command::Calendars => commands::calendars::run(&session).await,
        Command::Config { .. } => Ok(()),
    }
}
