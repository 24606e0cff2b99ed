//! Download engine. Builds the run's work list from the previous run's
//! failures plus the freshly fetched manifest, then fetches every item with
//! bounded concurrency and folds the outcomes into a [`RunSummary`].

pub mod error;
pub mod file;
pub mod paths;
pub mod summary;

use std::collections::{BTreeSet, HashSet};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::time::Instant;

use crate::config::Collection;
use crate::manifest::{ManifestError, ManifestRecord, ManifestSource};
use crate::retry::RetryConfig;
use crate::state::{FailureLog, WorkItem};
use crate::types::{AssetKind, KindSelection};

pub use file::FetchOutcome;
pub use paths::NamingRule;
pub use summary::RunSummary;

/// Subset of application config consumed by the download engine.
/// Decoupled from CLI parsing so the engine can be tested independently.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub(crate) selection: KindSelection,
    pub(crate) concurrency: usize,
    pub(crate) retry: RetryConfig,
    /// Upper bound on the whole run, manifest fetch included.
    pub(crate) timeout: Duration,
    pub(crate) no_progress_bar: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            selection: KindSelection::both(),
            concurrency: 10,
            retry: RetryConfig::default(),
            timeout: Duration::from_secs(3600),
            no_progress_bar: false,
        }
    }
}

const ASSET_KINDS: [AssetKind; 2] = [AssetKind::Image, AssetKind::Animation];

/// Turn manifest records into work items: one per selected asset kind whose
/// URL is present. Records the naming rule cannot place are skipped with a
/// warning.
pub fn build_work_items(
    records: &[ManifestRecord],
    naming: &NamingRule,
    selection: KindSelection,
) -> Vec<WorkItem> {
    let mut items = Vec::with_capacity(records.len());
    for record in records {
        for kind in ASSET_KINDS {
            if !selection.includes(kind) {
                continue;
            }
            let Some(url) = record.url_for(kind) else {
                continue;
            };
            match naming.destination(record, kind, url) {
                Some(path) => items.push(WorkItem::new(url, path)),
                None => tracing::warn!(
                    "Record {} has no usable id, skipping its {}",
                    record.id,
                    kind.as_str()
                ),
            }
        }
    }
    items
}

/// Resumed items first, then fresh ones, with at most one item per
/// destination path. A fresh item wins over a resumed one for the same path,
/// so a stale URL from the failure log never overwrites the current asset.
fn merge_work_items(resumed: BTreeSet<WorkItem>, fresh: Vec<WorkItem>) -> Vec<WorkItem> {
    let claimed: HashSet<&Path> = fresh.iter().map(|item| item.path.as_path()).collect();
    let mut seen: HashSet<PathBuf> = HashSet::with_capacity(resumed.len() + fresh.len());
    let mut merged = Vec::with_capacity(resumed.len() + fresh.len());

    for item in resumed {
        if claimed.contains(item.path.as_path()) {
            continue;
        }
        if seen.insert(item.path.clone()) {
            merged.push(item);
        } else {
            tracing::debug!(url = %item.url, path = %item.path.display(), "duplicate resumed item");
        }
    }
    for item in &fresh {
        if seen.insert(item.path.clone()) {
            merged.push(item.clone());
        } else {
            tracing::debug!(url = %item.url, path = %item.path.display(), "duplicate destination");
        }
    }
    merged
}

/// Create a progress bar with a consistent template.
///
/// Returns `ProgressBar::hidden()` when the user passed `--no-progress-bar` or
/// stdout is not a TTY (e.g. piped output, cron jobs).
fn create_progress_bar(no_progress_bar: bool, total: u64) -> ProgressBar {
    if no_progress_bar || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "Processing downloads [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    pb
}

/// Entry point for the download engine.
///
/// 1. Consume the failure log left by the previous run.
/// 2. Fetch the manifest. If that fails nothing is downloaded, the consumed
///    entries are written back, and the error is returned.
/// 3. Download resumed and fresh items with `concurrency` requests in flight.
/// 4. Rewrite the failure log with exactly this run's failures.
pub async fn run(
    client: &Client,
    source: &dyn ManifestSource,
    collection: &Collection,
    config: &DownloadConfig,
) -> Result<RunSummary> {
    let started = std::time::Instant::now();
    let deadline = Instant::now() + config.timeout;

    for kind in ASSET_KINDS {
        if config.selection.includes(kind) {
            let dir = &collection.naming.layout(kind).directory;
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    let mut failure_log = FailureLog::new(&collection.failure_log);
    let resumed = failure_log
        .load()
        .await
        .context("Failed to load failure log")?;
    if !resumed.is_empty() {
        tracing::info!(
            "Processing {} failed downloads from previous run...",
            resumed.len()
        );
    }

    tracing::info!("Fetching {} manifest from {}", collection.name, source.describe());
    let fetched = tokio::time::timeout_at(deadline, source.fetch_all())
        .await
        .unwrap_or(Err(ManifestError::DeadlineExceeded));
    let records = match fetched {
        Ok(records) => records,
        Err(e) => {
            failure_log.restore(resumed);
            if let Err(persist_err) = failure_log.persist().await {
                tracing::error!("Could not restore pending downloads: {}", persist_err);
            }
            return Err(e).context("Failed to fetch manifest");
        }
    };

    let fresh = build_work_items(&records, &collection.naming, config.selection);
    let items = merge_work_items(resumed, fresh);
    tracing::info!(
        records = records.len(),
        items = items.len(),
        concurrency = config.concurrency,
        "Starting downloads"
    );

    let pb = create_progress_bar(config.no_progress_bar, items.len() as u64);
    let retry = config.retry;
    let mut summary = RunSummary::default();

    let pb_ref = &pb;
    let outcomes = stream::iter(items)
        .map(|item| async move { file::fetch(client, &item, &retry, deadline, pb_ref).await })
        .buffer_unordered(config.concurrency.max(1));
    tokio::pin!(outcomes);

    while let Some(outcome) = outcomes.next().await {
        summary.record(&outcome);
        if let FetchOutcome::Failed { item, error } = outcome {
            // indicatif needs `suspend` to coordinate output with the bar redraw.
            pb.suspend(|| {
                tracing::error!("Download failed: {}: {}", item.path.display(), error);
            });
            failure_log.record(item);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let written = failure_log
        .persist()
        .await
        .context("Failed to save failure log")?;
    if written > 0 {
        tracing::info!(
            "{} failed downloads have been logged to {}",
            written,
            failure_log.path().display()
        );
    }

    tracing::info!("elapsed: {}", format_duration(started.elapsed()));
    Ok(summary)
}

fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
