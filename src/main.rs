//! rcsa-dl: bulk downloader for collection media.
//!
//! Fetches a collection's manifest, downloads every image and animation it
//! references with bounded concurrency and fixed-delay retries, skips files
//! already on disk, and records failures so the next run retries them first.

#![warn(clippy::all)]

mod cli;
mod config;
mod download;
mod manifest;
pub mod retry;
mod state;
mod types;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Command;
use config::{Collection, Config};
use manifest::HttpManifestSource;
use state::FailureLog;

/// Run the sync command.
async fn run_sync(args: cli::SyncArgs) -> anyhow::Result<()> {
    let config = Config::from_cli(args)?;
    tracing::info!(
        collection = %config.collection.name,
        concurrency = config.download.concurrency,
        "Starting rcsa-dl"
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!("rcsa-dl/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;
    let source = HttpManifestSource::new(client.clone(), config.collection.endpoint.clone());

    let summary = download::run(&client, &source, &config.collection, &config.download).await?;

    println!();
    println!("{summary}");
    Ok(())
}

/// Run the status command.
async fn run_status(args: cli::StatusArgs) -> anyhow::Result<()> {
    let collection = Collection::from_args(&args.target);
    let log = FailureLog::new(&collection.failure_log);

    let pending = log.peek().await?;
    if pending.is_empty() {
        println!("No pending downloads for {}", collection.name);
        return Ok(());
    }

    println!(
        "{} pending downloads in {}:",
        pending.len(),
        log.path().display()
    );
    for item in &pending {
        println!("  {} -> {}", item.url, item.path.display());
    }
    println!();
    println!("They will be retried on the next `rcsa-dl sync {}`.", collection.name);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    match cli.command {
        Command::Sync(args) => run_sync(args).await,
        Command::Status(args) => run_status(args).await,
    }
}
