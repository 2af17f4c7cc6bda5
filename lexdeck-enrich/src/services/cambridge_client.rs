//! Cambridge Dictionary client
//!
//! Fetches an entry page per word or phrase and hands it to
//! [`parse_entry_page`]. Requests are paced with a token-bucket limiter so a
//! long word list does not hammer the site.

use super::dictionary_page::{parse_entry_page, DictionaryEntry};
use super::http::build_http_client;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Url;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

pub const CAMBRIDGE_ORIGIN: &str = "https://dictionary.cambridge.org";
const ENTRY_PATH: [&str; 3] = ["us", "dictionary", "english"];

/// Dictionary lookup errors
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("HTTP error {0}")]
    HttpStatus(u16),

    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(String),
}

/// A dictionary that can be asked for one entry page at a time
#[async_trait]
pub trait DictionarySource: Send + Sync {
    /// Source identifier for logs (e.g. "Cambridge")
    fn source_id(&self) -> &'static str;

    /// Origin that relative audio references resolve against
    fn origin(&self) -> &str;

    /// Look up a word or phrase
    async fn lookup(&self, text: &str) -> Result<DictionaryEntry, DictionaryError>;
}

/// Cambridge Dictionary HTML client
pub struct CambridgeClient {
    http_client: reqwest::Client,
    origin: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl CambridgeClient {
    pub fn new(timeout: Duration, requests_per_second: u32) -> Result<Self, DictionaryError> {
        Self::with_origin(CAMBRIDGE_ORIGIN, timeout, requests_per_second)
    }

    /// Client against a different origin (mirrors, local fixtures)
    pub fn with_origin(
        origin: &str,
        timeout: Duration,
        requests_per_second: u32,
    ) -> Result<Self, DictionaryError> {
        let http_client =
            build_http_client(timeout).map_err(|e| DictionaryError::NetworkError(e.to_string()))?;

        let quota = Quota::per_second(NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            http_client,
            origin: origin.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::direct(quota),
        })
    }

    /// Entry page URL; the text is percent-encoded as one path segment
    pub fn entry_url(&self, text: &str) -> Result<Url, DictionaryError> {
        let mut url =
            Url::parse(&self.origin).map_err(|e| DictionaryError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| DictionaryError::InvalidUrl(self.origin.clone()))?
            .pop_if_empty()
            .extend(ENTRY_PATH)
            .push(text);
        Ok(url)
    }
}

#[async_trait]
impl DictionarySource for CambridgeClient {
    fn source_id(&self) -> &'static str {
        "Cambridge"
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    async fn lookup(&self, text: &str) -> Result<DictionaryEntry, DictionaryError> {
        self.rate_limiter.until_ready().await;

        let url = self.entry_url(text)?;
        tracing::debug!(text = %text, url = %url, "Querying dictionary");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| DictionaryError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(DictionaryError::NotFound(text.to_string()));
        }

        if !status.is_success() {
            return Err(DictionaryError::HttpStatus(status.as_u16()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| DictionaryError::NetworkError(e.to_string()))?;

        let entry = parse_entry_page(&html);

        tracing::debug!(
            text = %text,
            transcription = ?entry.transcription,
            part_of_speech = ?entry.part_of_speech,
            audio_sources = entry.audio.sources.len(),
            "Parsed dictionary entry"
        );

        Ok(entry)
    }
}
