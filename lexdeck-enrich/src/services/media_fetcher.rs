//! Raw media download (audio clips, images)

use super::http::build_http_client;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Download errors
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Empty response body from {0}")]
    EmptyBody(String),
}

/// Fetches the bytes behind a media URL
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// HTTP media fetcher
pub struct HttpMediaFetcher {
    http_client: reqwest::Client,
}

impl HttpMediaFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DownloadError> {
        let http_client =
            build_http_client(timeout).map_err(|e| DownloadError::NetworkError(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        tracing::debug!(url = %url, "Downloading media");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::NetworkError(e.to_string()))?;

        if body.is_empty() {
            return Err(DownloadError::EmptyBody(url.to_string()));
        }

        Ok(body.to_vec())
    }
}
