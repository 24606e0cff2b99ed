use clap::{Args, Parser, Subcommand};

use crate::types::*;

#[derive(Parser, Debug)]
#[command(
    name = "rcsa-dl",
    version,
    about = "Download collection images and animations, resuming failed downloads on the next run"
)]
pub struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download every asset in the collection manifest, retrying last run's failures first
    Sync(SyncArgs),
    /// Show downloads still pending from the last run without retrying them
    Status(StatusArgs),
}

/// Which collection to work on and where its files live.
#[derive(Args, Debug, Clone)]
pub struct CollectionArgs {
    /// Collection to download
    #[arg(value_enum)]
    pub collection: CollectionPreset,

    /// Base directory for output folders and the failure log
    #[arg(short = 'd', long, default_value = ".")]
    pub directory: String,

    /// Override the collection's manifest endpoint
    #[arg(long, env = "RCSA_ENDPOINT")]
    pub endpoint: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    #[command(flatten)]
    pub target: CollectionArgs,

    /// Download only images (combine with --animations for both)
    #[arg(long)]
    pub images: bool,

    /// Download only animations (combine with --images for both)
    #[arg(long)]
    pub animations: bool,

    /// Maximum number of downloads in flight
    #[arg(long, default_value_t = 10, env = "RCSA_CONCURRENCY",
          value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Time limit for the whole run, in seconds
    #[arg(long, default_value_t = 3600, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Attempts per asset before it is recorded as failed
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Seconds to wait between attempts
    #[arg(long, default_value_t = 1)]
    pub retry_delay: u64,

    /// Disable progress bar
    #[arg(long)]
    pub no_progress_bar: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: CollectionArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_defaults() {
        let cli = Cli::try_parse_from(["rcsa-dl", "sync", "memes"]).unwrap();
        let Command::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.target.collection, CollectionPreset::Memes);
        assert_eq!(args.target.directory, ".");
        assert!(!args.images);
        assert!(!args.animations);
        assert_eq!(args.concurrency, 10);
        assert_eq!(args.timeout, 3600);
        assert_eq!(args.max_attempts, 3);
        assert_eq!(args.retry_delay, 1);
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn test_sync_flags() {
        let cli = Cli::try_parse_from([
            "rcsa-dl",
            "sync",
            "pebs",
            "--images",
            "--concurrency",
            "4",
            "-d",
            "/tmp/out",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let Command::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.target.collection, CollectionPreset::Pebs);
        assert!(args.images);
        assert!(!args.animations);
        assert_eq!(args.concurrency, 4);
        assert_eq!(args.target.directory, "/tmp/out");
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(Cli::try_parse_from(["rcsa-dl", "sync", "memes", "--concurrency", "0"]).is_err());
    }

    #[test]
    fn test_unknown_collection_rejected() {
        assert!(Cli::try_parse_from(["rcsa-dl", "sync", "punks"]).is_err());
    }

    #[test]
    fn test_status_command() {
        let cli = Cli::try_parse_from(["rcsa-dl", "status", "pebs"]).unwrap();
        assert!(matches!(cli.command, Command::Status(_)));
    }
}
