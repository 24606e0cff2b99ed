use reqwest::Client;

use super::error::ManifestError;
use super::ManifestRecord;

/// Supplies the full list of records for one run.
#[async_trait::async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<ManifestRecord>, ManifestError>;

    /// Human-readable origin, used in log lines.
    fn describe(&self) -> &str;
}

/// Fetches the manifest with a single GET to a JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
    client: Client,
    endpoint: String,
}

impl HttpManifestSource {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait::async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch_all(&self) -> Result<Vec<ManifestRecord>, ManifestError> {
        let http_err = |source| ManifestError::Http {
            endpoint: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(http_err)?;

        if !response.status().is_success() {
            return Err(ManifestError::Status {
                endpoint: self.endpoint.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(http_err)?;
        let records: Vec<ManifestRecord> =
            serde_json::from_slice(&body).map_err(|source| ManifestError::Json {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        tracing::debug!(
            count = records.len(),
            endpoint = %self.endpoint,
            "fetched manifest"
        );
        Ok(records)
    }

    fn describe(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source_for(server: &MockServer) -> HttpManifestSource {
        HttpManifestSource::new(Client::new(), format!("{}/media", server.uri()))
    }

    #[tokio::test]
    async fn test_fetch_all_parses_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id": 1, "image": "http://x/1.png", "animation": null, "name": "one"},
                    {"id": "2", "image": "", "animation": "http://x/2.mp4"}]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let records = source_for(&server).await.fetch_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].numeric_id(), Some(1));
        assert_eq!(records[0].image.as_deref(), Some("http://x/1.png"));
        assert_eq!(records[1].numeric_id(), Some(2));
        assert_eq!(records[1].animation.as_deref(), Some("http://x/2.mp4"));
    }

    #[tokio::test]
    async fn test_fetch_all_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_all().await.unwrap_err();
        assert!(matches!(err, ManifestError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_all_rejects_non_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error": "nope"}"#))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_all().await.unwrap_err();
        assert!(matches!(err, ManifestError::Json { .. }));
    }

    #[tokio::test]
    async fn test_fetch_all_connection_refused() {
        let source = HttpManifestSource::new(Client::new(), "http://127.0.0.1:1/media");
        let err = source.fetch_all().await.unwrap_err();
        assert!(matches!(err, ManifestError::Http { .. }));
    }
}
