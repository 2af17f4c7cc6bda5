//! Unsplash image search client

use super::http::build_http_client;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const UNSPLASH_BASE_URL: &str = "https://api.unsplash.com";

/// Image search errors
#[derive(Debug, Error)]
pub enum ImageSearchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid access key")]
    InvalidAccessKey,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Finds one representative image for a term
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// URL of the top result; `None` when the search returned nothing
    async fn top_image_url(&self, query: &str) -> Result<Option<String>, ImageSearchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Unsplash search API client
pub struct UnsplashClient {
    http_client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(access_key: String, timeout: Duration) -> Result<Self, ImageSearchError> {
        let http_client = build_http_client(timeout)
            .map_err(|e| ImageSearchError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: UNSPLASH_BASE_URL.to_string(),
            access_key,
        })
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn top_image_url(&self, query: &str) -> Result<Option<String>, ImageSearchError> {
        let url = format!("{}/search/photos", self.base_url);
        let params = [
            ("query", query),
            ("client_id", self.access_key.as_str()),
            ("per_page", "1"),
        ];

        tracing::debug!(query = %query, "Querying image search");

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ImageSearchError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(ImageSearchError::InvalidAccessKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ImageSearchError::ApiError(status.as_u16(), error_text));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ImageSearchError::ParseError(e.to_string()))?;

        Ok(top_result(body))
    }
}

fn top_result(body: SearchResponse) -> Option<String> {
    body.results.into_iter().next().map(|photo| photo.urls.regular)
}
