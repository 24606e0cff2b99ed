//! Error types for the resume state module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the failure log.
#[derive(Error, Debug)]
pub enum StateError {
    /// The failure log exists but could not be read.
    #[error("Failed to read failure log at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The failure log could not be written or moved into place.
    #[error("Failed to write failure log at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The consumed failure log could not be deleted.
    #[error("Failed to remove failure log at {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A work item could not be encoded as a log line.
    #[error("Failed to encode failure log entry: {0}")]
    Encode(#[from] serde_json::Error),
}
