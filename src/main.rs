// ABOUTME: Entry point for the rapidctl CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use rapidctl::client::CtlClient;
use rapidctl::config::{self, CONFIG_FILENAME, Config};
use rapidctl::error::Result;
use rapidctl::output::Output;
use rapidctl::preferences::PreferenceStore;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output_mode());
    if matches!(cli.command, Commands::Ensure) {
        output.start_timer();
    }
    let result = run(cli.command, &output).await;

    if let Err(e) = result {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, output: &Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match command {
        Commands::Init {
            repository,
            baseline_version,
            force,
        } => {
            config::init_config(
                &cwd,
                repository.as_deref(),
                baseline_version.as_deref(),
                force,
            )?;
            output.success(&format!("Created {CONFIG_FILENAME}"));
            Ok(())
        }
        Commands::Status => {
            let (_, client) = load_client(&cwd)?;
            commands::status(&client, output);
            Ok(())
        }
        Commands::Versions => {
            let (config, client) = load_client(&cwd)?;
            commands::versions(&config, &client, output).await
        }
        Commands::Check { apply } => {
            let (config, mut client) = load_client(&cwd)?;
            commands::check(&config, &mut client, apply, output).await
        }
        Commands::Use { tag } => {
            let (_, mut client) = load_client(&cwd)?;
            commands::pin(&mut client, &tag, output)
        }
        Commands::Ensure => {
            let (config, client) = load_client(&cwd)?;
            commands::ensure(&config, &client, output).await
        }
    }
}

fn load_client(cwd: &std::path::Path) -> Result<(Config, CtlClient)> {
    let config = Config::discover(cwd)?;
    let store = PreferenceStore::default_location()?;
    let client = CtlClient::new(&config, store);
    Ok((config, client))
}
