//! Types for the resume state module.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One remote asset and the local file it should be written to.
///
/// Two items are the same item when both the URL and the destination match;
/// sets of items are ordered so that persisted output is stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkItem {
    pub url: String,
    pub path: PathBuf,
}

impl WorkItem {
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
        }
    }
}

/// Separator used by logs written before entries were JSON encoded.
pub(crate) const LEGACY_SEPARATOR: char = '|';

impl WorkItem {
    /// Encode as a single failure-log line (no trailing newline).
    pub(crate) fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode one failure-log line.
    ///
    /// JSON objects are the current format. Anything else is read as the
    /// legacy `url|path` form, split on the last separator so a `|` inside
    /// the URL survives. Returns `None` for lines that match neither.
    pub(crate) fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if line.starts_with('{') {
            return serde_json::from_str(line).ok();
        }
        let (url, path) = line.rsplit_once(LEGACY_SEPARATOR)?;
        if url.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self::new(url, path))
    }
}
