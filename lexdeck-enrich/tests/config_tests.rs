//! EnrichConfig resolution tests
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.

use lexdeck_common::config::TomlConfig;
use lexdeck_enrich::config::{
    AudioStrategy, CliOverrides, EnrichConfig, ENV_ANKI_BASE_FOLDER, ENV_AUDIOS_FOLDER,
    ENV_AUDIO_STRATEGY, ENV_IMAGES_FOLDER, ENV_TARGET_LANGUAGE, ENV_UNSPLASH_ACCESS_KEY,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

fn clear_env() {
    for var in [
        ENV_UNSPLASH_ACCESS_KEY,
        ENV_ANKI_BASE_FOLDER,
        ENV_IMAGES_FOLDER,
        ENV_AUDIOS_FOLDER,
        ENV_AUDIO_STRATEGY,
        ENV_TARGET_LANGUAGE,
        "LEXDECK_TEST_HOME",
    ] {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_any_source() {
    clear_env();

    let config = EnrichConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap();

    assert_eq!(config.unsplash_access_key, None);
    assert_eq!(config.anki_base_folder, None);
    assert_eq!(config.images_folder, PathBuf::from("images"));
    assert_eq!(config.audios_folder, PathBuf::from("audios"));
    assert_eq!(config.audio_strategy, AudioStrategy::Dictionary);
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "vi");
    assert_eq!(config.dictionary_requests_per_second, 2);
}

#[test]
#[serial]
fn test_toml_values_used_when_environment_empty() {
    clear_env();
    let toml = TomlConfig {
        unsplash_access_key: Some("toml-key".to_string()),
        images_folder: Some("pics".to_string()),
        audio_strategy: Some("synthesized".to_string()),
        target_language: Some("fr".to_string()),
        request_timeout_secs: Some(30),
        ..TomlConfig::default()
    };

    let config = EnrichConfig::resolve(&CliOverrides::default(), &toml).unwrap();

    assert_eq!(config.unsplash_access_key.as_deref(), Some("toml-key"));
    assert_eq!(config.images_folder, PathBuf::from("pics"));
    assert_eq!(config.audio_strategy, AudioStrategy::Synthesized);
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}

#[test]
#[serial]
fn test_environment_beats_toml_and_cli_beats_environment() {
    clear_env();
    env::set_var(ENV_UNSPLASH_ACCESS_KEY, "env-key");
    env::set_var(ENV_AUDIOS_FOLDER, "env-audios");
    env::set_var(ENV_AUDIO_STRATEGY, "synthesized");

    let toml = TomlConfig {
        unsplash_access_key: Some("toml-key".to_string()),
        audios_folder: Some("toml-audios".to_string()),
        ..TomlConfig::default()
    };
    let cli = CliOverrides {
        audio_strategy: Some("dictionary".to_string()),
        ..CliOverrides::default()
    };

    let config = EnrichConfig::resolve(&cli, &toml).unwrap();

    assert_eq!(config.unsplash_access_key.as_deref(), Some("env-key"));
    assert_eq!(config.audios_folder, PathBuf::from("env-audios"));
    assert_eq!(config.audio_strategy, AudioStrategy::Dictionary);

    clear_env();
}

#[test]
#[serial]
fn test_anki_base_expands_environment_references() {
    clear_env();
    env::set_var("LEXDECK_TEST_HOME", "/home/tester");
    env::set_var(ENV_ANKI_BASE_FOLDER, "$LEXDECK_TEST_HOME/.local/share/Anki2");

    let config = EnrichConfig::resolve(&CliOverrides::default(), &TomlConfig::default()).unwrap();

    assert_eq!(
        config.anki_base_folder,
        Some(PathBuf::from("/home/tester/.local/share/Anki2"))
    );

    clear_env();
}

#[test]
#[serial]
fn test_unknown_audio_strategy_rejected() {
    clear_env();
    env::set_var(ENV_AUDIO_STRATEGY, "both");

    let result = EnrichConfig::resolve(&CliOverrides::default(), &TomlConfig::default());
    assert!(result.is_err());

    clear_env();
}
