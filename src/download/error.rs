use thiserror::Error;

/// Typed download errors enabling retry classification.
///
/// Anything the server or network did wrong is worth another attempt. Local
/// disk failures and an expired run deadline are not; they end the item as
/// failed straight away so the rest of the batch can continue.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Empty content received for {url}")]
    EmptyBody { url: String },

    #[error("Request failed for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Disk error writing {path}: {source}")]
    Disk {
        path: String,
        source: std::io::Error,
    },

    #[error("Run deadline passed before {url} finished")]
    DeadlineExceeded { url: String },
}

impl DownloadError {
    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            DownloadError::HttpStatus { .. } => true,
            DownloadError::EmptyBody { .. } => true,
            DownloadError::Http { .. } => true,
            DownloadError::Disk { .. } => false,
            DownloadError::DeadlineExceeded { .. } => false,
        }
    }
}
