use std::path::Path;

use indicatif::ProgressBar;
use reqwest::{Client, StatusCode};
use tokio::fs;
use tokio::time::Instant;

use super::error::DownloadError;
use crate::retry::{self, RetryAction, RetryConfig};
use crate::state::failure_log::sibling_with_suffix;
use crate::state::WorkItem;

/// Result of processing one work item. Exactly one is produced per
/// dispatched item.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The item had no URL; nothing was attempted.
    NoOp,
    /// A non-empty file was already at the destination.
    Skipped,
    Downloaded,
    Failed { item: WorkItem, error: DownloadError },
}

/// Download one item unless it is already on disk.
///
/// An existing non-empty destination is never touched and costs no request.
/// Otherwise the URL is fetched up to `retry_config.max_attempts` times with
/// a fixed delay between attempts; each attempt is cut off at `deadline`.
/// Errors never escape: they come back as [`FetchOutcome::Failed`].
/// Retry warnings are printed through `pb` so they do not tear the bar.
pub async fn fetch(
    client: &Client,
    item: &WorkItem,
    retry_config: &RetryConfig,
    deadline: Instant,
    pb: &ProgressBar,
) -> FetchOutcome {
    if item.url.trim().is_empty() {
        return FetchOutcome::NoOp;
    }

    if is_complete(&item.path).await {
        tracing::debug!(path = %item.path.display(), "already downloaded");
        return FetchOutcome::Skipped;
    }

    let result = retry::retry_with_backoff(
        retry_config,
        |e: &DownloadError| {
            if e.is_retryable() {
                RetryAction::Retry
            } else {
                RetryAction::Abort
            }
        },
        |attempt, e: &DownloadError| {
            pb.suspend(|| {
                tracing::warn!(
                    "Attempt {}/{} failed, retrying in {}ms: {}",
                    attempt,
                    retry_config.attempts(),
                    retry_config.delay.as_millis(),
                    e
                );
            });
        },
        || async move {
            match tokio::time::timeout_at(deadline, attempt_download(client, item)).await {
                Ok(result) => result,
                Err(_) => Err(DownloadError::DeadlineExceeded {
                    url: item.url.clone(),
                }),
            }
        },
    )
    .await;

    match result {
        Ok(()) => {
            tracing::debug!("Downloaded {}", item.path.display());
            FetchOutcome::Downloaded
        }
        Err(error) => FetchOutcome::Failed {
            item: item.clone(),
            error,
        },
    }
}

/// True when `path` is a file with at least one byte in it.
async fn is_complete(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Single GET; only a 200 with a non-empty body counts.
async fn attempt_download(client: &Client, item: &WorkItem) -> Result<(), DownloadError> {
    let http_err = |source| DownloadError::Http {
        url: item.url.clone(),
        source,
    };

    let response = client.get(&item.url).send().await.map_err(http_err)?;

    if response.status() != StatusCode::OK {
        return Err(DownloadError::HttpStatus {
            status: response.status().as_u16(),
            url: item.url.clone(),
        });
    }

    let body = response.bytes().await.map_err(http_err)?;
    if body.is_empty() {
        return Err(DownloadError::EmptyBody {
            url: item.url.clone(),
        });
    }

    write_file(&item.path, &body).await
}

/// Write `contents` to a `.part` sibling and rename it over `path`, so an
/// interrupted write never leaves a truncated file that a later run would
/// mistake for a finished one.
async fn write_file(path: &Path, contents: &[u8]) -> Result<(), DownloadError> {
    let disk_err = |source| DownloadError::Disk {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(disk_err)?;
    }

    let part_path = sibling_with_suffix(path, ".part");
    if let Err(e) = fs::write(&part_path, contents).await {
        let _ = fs::remove_file(&part_path).await;
        return Err(disk_err(e));
    }
    fs::rename(&part_path, path).await.map_err(disk_err)?;

    Ok(())
}
