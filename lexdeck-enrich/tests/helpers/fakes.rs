//! In-memory collaborators; nothing here touches the network

use async_trait::async_trait;
use lexdeck_enrich::services::{
    DictionaryEntry, DictionaryError, DictionarySource, DownloadError, ImageSearch,
    ImageSearchError, MediaFetcher, SpeechError, SpeechSynthesizer, TranslateError, Translator,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const FAKE_ORIGIN: &str = "https://dictionary.test";

/// Dictionary backed by a map; unknown texts are "not found"
#[derive(Default)]
pub struct FakeDictionary {
    entries: HashMap<String, DictionaryEntry>,
    failing: HashSet<String>,
    lookups: Mutex<Vec<String>>,
}

impl FakeDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, text: &str, entry: DictionaryEntry) -> Self {
        self.entries.insert(text.to_string(), entry);
        self
    }

    /// Lookups of `text` fail with a network error
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    /// Every text looked up so far, in call order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl DictionarySource for FakeDictionary {
    fn source_id(&self) -> &'static str {
        "Fake"
    }

    fn origin(&self) -> &str {
        FAKE_ORIGIN
    }

    async fn lookup(&self, text: &str) -> Result<DictionaryEntry, DictionaryError> {
        self.lookups.lock().unwrap().push(text.to_string());

        if self.failing.contains(text) {
            return Err(DictionaryError::NetworkError("connection reset".to_string()));
        }
        self.entries
            .get(text)
            .cloned()
            .ok_or_else(|| DictionaryError::NotFound(text.to_string()))
    }
}

/// Translator backed by a map; unknown texts fail
#[derive(Default)]
pub struct FakeTranslator {
    translations: HashMap<String, String>,
}

impl FakeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, translation: &str) -> Self {
        self.translations.insert(text.to_string(), translation.to_string());
        self
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.translations
            .get(text)
            .cloned()
            .ok_or_else(|| TranslateError::ApiError(503, "unavailable".to_string()))
    }
}

/// Image search backed by a map of query to image URL
#[derive(Default)]
pub struct FakeImageSearch {
    results: HashMap<String, String>,
    failing: bool,
}

impl FakeImageSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, url: &str) -> Self {
        self.results.insert(query.to_string(), url.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImageSearch for FakeImageSearch {
    async fn top_image_url(&self, query: &str) -> Result<Option<String>, ImageSearchError> {
        if self.failing {
            return Err(ImageSearchError::InvalidAccessKey);
        }
        Ok(self.results.get(query).cloned())
    }
}

/// Speech synthesizer producing deterministic bytes per text
#[derive(Default)]
pub struct FakeSpeech {
    failing: bool,
}

impl FakeSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { failing: true }
    }

    pub fn audio_for(text: &str) -> Vec<u8> {
        format!("ID3 speech:{}", text).into_bytes()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        if self.failing {
            return Err(SpeechError::ApiError(500));
        }
        Ok(Self::audio_for(text))
    }
}

/// Fetcher backed by a map of URL to bytes; unknown URLs are 404
#[derive(Default)]
pub struct FakeFetcher {
    bodies: HashMap<String, Vec<u8>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| DownloadError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}
