use thiserror::Error;

/// Failure to obtain the manifest. Always fatal to the run.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("HTTP error fetching manifest from {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("Manifest endpoint {endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("Manifest from {endpoint} is not a JSON array of records: {source}")]
    Json {
        endpoint: String,
        source: serde_json::Error,
    },
    #[error("Run deadline passed before the manifest was fetched")]
    DeadlineExceeded,
}
