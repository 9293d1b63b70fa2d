//! Parley API Client - Main Entry Point
//!
//! Loads settings, opens the token file and runs one command against the
//! backend. Response bodies go to stdout, logs to stderr.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use parley_application::AuthenticatedHttpClient;
use parley_infrastructure::{FileTokenStore, ReqwestHttpClient, load_settings};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::Command;

/// Command line client for the Parley forum API.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
struct Cli {
    /// Settings file (TOML). Defaults to `<config dir>/parley/config.toml`.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Token file. Defaults to `<config dir>/parley/tokens.json`.
    #[arg(long, env = "PARLEY_TOKEN_FILE", global = true)]
    token_file: Option<PathBuf>,

    /// Override the API base URL from the settings.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref()).context("loading settings")?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }

    let token_file = match cli.token_file {
        Some(path) => path,
        None => FileTokenStore::default_path()
            .context("no config directory on this platform, pass --token-file")?,
    };
    debug!(base_url = %settings.base_url, token_file = %token_file.display(), "starting");

    let http = ReqwestHttpClient::new(&settings).context("creating HTTP client")?;
    let store = FileTokenStore::new(token_file);
    let client = AuthenticatedHttpClient::new(Arc::new(http), Arc::new(store), settings)
        .context("invalid settings")?;

    let output = cli.command.run(client).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
