//! Persisted set of downloads that failed in the previous run.
//!
//! The log is consumed exactly once: `load` reads it and deletes it, the run
//! records its own failures in memory, and `persist` rewrites the log from
//! scratch. A run with no failures leaves no file behind.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::error::StateError;
use super::types::WorkItem;

#[derive(Debug)]
pub struct FailureLog {
    path: PathBuf,
    failures: BTreeSet<WorkItem>,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            failures: BTreeSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the previous run's failures and delete the log.
    ///
    /// Duplicate lines collapse into one item. Returns an empty set when no
    /// log exists.
    pub async fn load(&self) -> Result<BTreeSet<WorkItem>, StateError> {
        let Some(items) = self.read().await? else {
            return Ok(BTreeSet::new());
        };

        fs::remove_file(&self.path)
            .await
            .map_err(|source| StateError::Remove {
                path: self.path.clone(),
                source,
            })?;

        tracing::info!(
            "Found {} failed downloads from previous run in {}",
            items.len(),
            self.path.display()
        );
        Ok(items)
    }

    /// Read the log without consuming it.
    pub async fn peek(&self) -> Result<BTreeSet<WorkItem>, StateError> {
        Ok(self.read().await?.unwrap_or_default())
    }

    async fn read(&self) -> Result<Option<BTreeSet<WorkItem>>, StateError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StateError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut items = BTreeSet::new();
        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match WorkItem::from_line(line) {
                Some(item) => {
                    items.insert(item);
                }
                None => tracing::warn!(
                    "Ignoring malformed entry on line {} of {}",
                    lineno + 1,
                    self.path.display()
                ),
            }
        }
        Ok(Some(items))
    }

    /// Remember a failed item for this run. Returns `false` if it was
    /// already recorded.
    pub fn record(&mut self, item: WorkItem) -> bool {
        self.failures.insert(item)
    }

    /// Put previously loaded items back so a later `persist` keeps them.
    pub fn restore(&mut self, items: impl IntoIterator<Item = WorkItem>) {
        self.failures.extend(items);
    }

    /// Write this run's failures, one JSON object per line, replacing any
    /// existing log. Returns the number of entries written; writes nothing
    /// when there were no failures.
    pub async fn persist(&self) -> Result<usize, StateError> {
        if self.failures.is_empty() {
            return Ok(0);
        }

        let mut out = String::new();
        for item in &self.failures {
            out.push_str(&item.to_line()?);
            out.push('\n');
        }

        let write_err = |source| StateError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        // Write beside the target and rename so a crash never leaves a
        // half-written log.
        let tmp_path = sibling_with_suffix(&self.path, ".tmp");
        fs::write(&tmp_path, out).await.map_err(write_err)?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(write_err)?;

        Ok(self.failures.len())
    }
}

/// `dir/name.ext` -> `dir/name.ext<suffix>`.
pub(crate) fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
