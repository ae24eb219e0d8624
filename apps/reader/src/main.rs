use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexicon_reader_lib::{LocalStore, ReaderConfig, SqliteRepository};

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("lexicon error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = ReaderConfig::from_env()?;
    init_tracing(cli.quiet, cli.verbose);

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tracing::debug!(path = %config.db_path.display(), "opening database");
    let repository = SqliteRepository::open(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let store = Arc::new(LocalStore::new(repository, config.save_policy));

    commands::dispatch(cli.command, store, &config).await
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
