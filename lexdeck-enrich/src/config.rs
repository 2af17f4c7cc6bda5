//! Configuration resolution for lexdeck-enrich
//!
//! Builds the immutable [`EnrichConfig`] handed to every component.
//! Each setting is resolved CLI → ENV → TOML → built-in default.

use lexdeck_common::config::{expand_env_vars, resolve_setting, SettingSource, TomlConfig};
use lexdeck_common::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const ENV_UNSPLASH_ACCESS_KEY: &str = "UNSPLASH_ACCESS_KEY";
pub const ENV_ANKI_BASE_FOLDER: &str = "ANKI_BASE_FOLDER";
pub const ENV_IMAGES_FOLDER: &str = "IMAGES_FOLDER";
pub const ENV_AUDIOS_FOLDER: &str = "AUDIOS_FOLDER";
pub const ENV_AUDIO_STRATEGY: &str = "LEXDECK_AUDIO_STRATEGY";
pub const ENV_TARGET_LANGUAGE: &str = "LEXDECK_TARGET_LANGUAGE";

const DEFAULT_IMAGES_FOLDER: &str = "images";
const DEFAULT_AUDIOS_FOLDER: &str = "audios";
const DEFAULT_SOURCE_LANGUAGE: &str = "en";
const DEFAULT_TARGET_LANGUAGE: &str = "vi";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DICTIONARY_RPS: u32 = 2;

/// How audio is produced for each term (one strategy per deployment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioStrategy {
    /// Download the pronunciation clip referenced by the dictionary page
    #[default]
    Dictionary,
    /// Synthesize speech for the term
    Synthesized,
}

impl FromStr for AudioStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dictionary" => Ok(AudioStrategy::Dictionary),
            "synthesized" | "tts" => Ok(AudioStrategy::Synthesized),
            other => Err(Error::Config(format!(
                "Unknown audio strategy '{}' (expected 'dictionary' or 'synthesized')",
                other
            ))),
        }
    }
}

impl fmt::Display for AudioStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioStrategy::Dictionary => f.write_str("dictionary"),
            AudioStrategy::Synthesized => f.write_str("synthesized"),
        }
    }
}

/// Values supplied on the command line (highest priority)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub anki_base_folder: Option<String>,
    pub audio_strategy: Option<String>,
}

/// Immutable configuration threaded through component constructors
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub unsplash_access_key: Option<String>,
    pub anki_base_folder: Option<PathBuf>,
    pub images_folder: PathBuf,
    pub audios_folder: PathBuf,
    pub audio_strategy: AudioStrategy,
    pub source_language: String,
    pub target_language: String,
    pub request_timeout: Duration,
    pub dictionary_requests_per_second: u32,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            unsplash_access_key: None,
            anki_base_folder: None,
            images_folder: PathBuf::from(DEFAULT_IMAGES_FOLDER),
            audios_folder: PathBuf::from(DEFAULT_AUDIOS_FOLDER),
            audio_strategy: AudioStrategy::default(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dictionary_requests_per_second: DEFAULT_DICTIONARY_RPS,
        }
    }
}

impl EnrichConfig {
    /// Resolve every setting from CLI → ENV → TOML → default
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let defaults = Self::default();

        let unsplash_access_key = resolve_setting(
            None,
            ENV_UNSPLASH_ACCESS_KEY,
            toml.unsplash_access_key.as_deref(),
        );
        if let Some(key) = &unsplash_access_key {
            if key.offered_by.len() > 1 {
                warn!(
                    "Unsplash access key found in multiple sources: {}. Using {} (highest priority).",
                    key.offered_by
                        .iter()
                        .map(SettingSource::as_str)
                        .collect::<Vec<_>>()
                        .join(", "),
                    key.source.as_str()
                );
            }
            info!("Unsplash access key loaded from {}", key.source.as_str());
        } else {
            warn!("Unsplash access key not configured; images will be skipped");
        }

        let anki_base_folder = resolve_setting(
            cli.anki_base_folder.as_deref(),
            ENV_ANKI_BASE_FOLDER,
            toml.anki_base_folder.as_deref(),
        )
        .map(|s| PathBuf::from(expand_env_vars(&s.value)));

        let images_folder = resolve_setting(None, ENV_IMAGES_FOLDER, toml.images_folder.as_deref())
            .map(|s| PathBuf::from(s.value))
            .unwrap_or(defaults.images_folder);

        let audios_folder = resolve_setting(None, ENV_AUDIOS_FOLDER, toml.audios_folder.as_deref())
            .map(|s| PathBuf::from(s.value))
            .unwrap_or(defaults.audios_folder);

        let audio_strategy = match resolve_setting(
            cli.audio_strategy.as_deref(),
            ENV_AUDIO_STRATEGY,
            toml.audio_strategy.as_deref(),
        ) {
            Some(setting) => setting.value.parse()?,
            None => defaults.audio_strategy,
        };

        let source_language = toml
            .source_language
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.source_language);

        let target_language = resolve_setting(
            None,
            ENV_TARGET_LANGUAGE,
            toml.target_language.as_deref(),
        )
        .map(|s| s.value)
        .unwrap_or(defaults.target_language);

        let request_timeout = toml
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let dictionary_requests_per_second = toml
            .dictionary_requests_per_second
            .filter(|rps| *rps > 0)
            .unwrap_or(defaults.dictionary_requests_per_second);

        Ok(Self {
            unsplash_access_key: unsplash_access_key.map(|s| s.value),
            anki_base_folder,
            images_folder,
            audios_folder,
            audio_strategy,
            source_language,
            target_language,
            request_timeout,
            dictionary_requests_per_second,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_strategy_parse() {
        assert_eq!("dictionary".parse::<AudioStrategy>().unwrap(), AudioStrategy::Dictionary);
        assert_eq!(" Synthesized ".parse::<AudioStrategy>().unwrap(), AudioStrategy::Synthesized);
        assert_eq!("tts".parse::<AudioStrategy>().unwrap(), AudioStrategy::Synthesized);
        assert!("both".parse::<AudioStrategy>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = EnrichConfig::default();
        assert_eq!(config.images_folder, PathBuf::from("images"));
        assert_eq!(config.audios_folder, PathBuf::from("audios"));
        assert_eq!(config.audio_strategy, AudioStrategy::Dictionary);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
