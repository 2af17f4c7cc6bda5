//! Text-to-speech client (Google Translate TTS endpoint)

use super::http::build_http_client;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

const GOOGLE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Speech synthesis errors
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}")]
    ApiError(u16),

    #[error("Provider returned no audio for: {0}")]
    EmptyAudio(String),
}

/// Synthesizes spoken audio (MP3 bytes) for a term
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Google TTS client
pub struct GoogleTtsClient {
    http_client: reqwest::Client,
    language: String,
}

impl GoogleTtsClient {
    pub fn new(language: &str, timeout: Duration) -> Result<Self, SpeechError> {
        let http_client =
            build_http_client(timeout).map_err(|e| SpeechError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            language: language.to_string(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let params = [
            ("ie", "UTF-8"),
            ("q", text),
            ("tl", self.language.as_str()),
            ("client", "tw-ob"),
        ];

        tracing::debug!(text = %text, language = %self.language, "Requesting speech synthesis");

        let response = self
            .http_client
            .get(GOOGLE_TTS_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| SpeechError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::ApiError(status.as_u16()));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::NetworkError(e.to_string()))?;

        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio(text.to_string()));
        }

        Ok(audio.to_vec())
    }
}
