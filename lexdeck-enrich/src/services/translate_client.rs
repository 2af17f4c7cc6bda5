//! Google Translate client (public `gtx` endpoint)

use super::http::build_http_client;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const GOOGLE_TRANSLATE_BASE_URL: &str = "https://translate.googleapis.com";

/// Translation errors
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Empty translation for: {0}")]
    EmptyResult(String),
}

/// Translates one term into the configured target language
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

/// Google Translate client
pub struct GoogleTranslateClient {
    http_client: reqwest::Client,
    base_url: String,
    source_language: String,
    target_language: String,
}

impl GoogleTranslateClient {
    pub fn new(
        source_language: &str,
        target_language: &str,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let http_client =
            build_http_client(timeout).map_err(|e| TranslateError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: GOOGLE_TRANSLATE_BASE_URL.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let url = format!("{}/translate_a/single", self.base_url);
        let params = [
            ("client", "gtx"),
            ("sl", self.source_language.as_str()),
            ("tl", self.target_language.as_str()),
            ("dt", "t"),
            ("q", text),
        ];

        tracing::debug!(text = %text, target = %self.target_language, "Querying translator");

        let response = self
            .http_client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| TranslateError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranslateError::ApiError(status.as_u16(), error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::ParseError(e.to_string()))?;

        parse_translation(&body).ok_or_else(|| TranslateError::EmptyResult(text.to_string()))
    }
}

/// Join the translated segments of a `translate_a/single` response
///
/// The response is a nested array whose first element lists
/// `[translated, original, ...]` segments.
pub fn parse_translation(body: &Value) -> Option<String> {
    let translated: String = body
        .get(0)?
        .as_array()?
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let translated = translated.trim();
    if translated.is_empty() {
        None
    } else {
        Some(translated.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = GoogleTranslateClient::new("en", "vi", Duration::from_secs(10));
        assert!(client.is_ok());
    }

    #[test]
    fn test_parse_single_segment() {
        let body = json!([[["nhanh", "quick", null, null, 10]], null, "en"]);
        assert_eq!(parse_translation(&body).as_deref(), Some("nhanh"));
    }

    #[test]
    fn test_parse_joins_segments() {
        let body = json!([[["Xin chào. ", "Hello. "], ["Tạm biệt", "Goodbye"]], null, "en"]);
        assert_eq!(parse_translation(&body).as_deref(), Some("Xin chào. Tạm biệt"));
    }

    #[test]
    fn test_parse_unexpected_shape() {
        assert!(parse_translation(&json!({"error": "bad"})).is_none());
        assert!(parse_translation(&json!([null])).is_none());
        assert!(parse_translation(&json!([[["", "x"]]])).is_none());
    }
}
