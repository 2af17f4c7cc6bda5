//! Test Helper Utilities
//!
//! Shared utilities for testing lexdeck-enrich

#![allow(dead_code)]

pub mod fakes;
pub mod log_capture;

pub use fakes::{
    FakeDictionary, FakeFetcher, FakeImageSearch, FakeSpeech, FakeTranslator, FAKE_ORIGIN,
};

use lexdeck_enrich::config::{AudioStrategy, EnrichConfig};
use lexdeck_enrich::services::DictionaryEntry;
use lexdeck_enrich::types::AudioReferences;
use std::path::Path;

/// Config whose media folders live under `root`
pub fn fixture_config(root: &Path, strategy: AudioStrategy) -> EnrichConfig {
    EnrichConfig {
        images_folder: root.join("images"),
        audios_folder: root.join("audios"),
        audio_strategy: strategy,
        ..EnrichConfig::default()
    }
}

/// Dictionary entry with a transcription, a part of speech and one audio source
pub fn entry(ipa: &str, pos: &str, audio_source: Option<&str>) -> DictionaryEntry {
    DictionaryEntry {
        transcription: Some(ipa.to_string()),
        part_of_speech: Some(pos.to_string()),
        audio: AudioReferences {
            sources: audio_source.map(|s| vec![s.to_string()]).unwrap_or_default(),
            ..Default::default()
        },
    }
}
