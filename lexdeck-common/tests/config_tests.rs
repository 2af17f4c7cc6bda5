//! Integration tests for configuration loading and tiered setting resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate environment variables are marked with #[serial].

use lexdeck_common::config::{
    expand_env_vars, load_config, load_toml_config, resolve_setting, ConfigOrigin, SettingSource,
};
use lexdeck_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_beats_environment_and_toml() {
    env::set_var("LEXDECK_TEST_SETTING", "from-env");

    let resolved =
        resolve_setting(Some("from-cli"), "LEXDECK_TEST_SETTING", Some("from-toml")).unwrap();

    assert_eq!(resolved.value, "from-cli");
    assert_eq!(resolved.source, SettingSource::CommandLine);
    assert_eq!(
        resolved.offered_by,
        vec![
            SettingSource::CommandLine,
            SettingSource::Environment,
            SettingSource::TomlFile
        ]
    );

    env::remove_var("LEXDECK_TEST_SETTING");
}

#[test]
#[serial]
fn test_environment_beats_toml() {
    env::set_var("LEXDECK_TEST_SETTING", "from-env");

    let resolved = resolve_setting(None, "LEXDECK_TEST_SETTING", Some("from-toml")).unwrap();

    assert_eq!(resolved.value, "from-env");
    assert_eq!(resolved.source, SettingSource::Environment);

    env::remove_var("LEXDECK_TEST_SETTING");
}

#[test]
#[serial]
fn test_blank_values_fall_through() {
    env::set_var("LEXDECK_TEST_SETTING", "   ");

    let resolved = resolve_setting(Some(""), "LEXDECK_TEST_SETTING", Some("from-toml")).unwrap();

    assert_eq!(resolved.value, "from-toml");
    assert_eq!(resolved.source, SettingSource::TomlFile);
    assert_eq!(resolved.offered_by, vec![SettingSource::TomlFile]);

    env::remove_var("LEXDECK_TEST_SETTING");
}

#[test]
#[serial]
fn test_no_source_returns_none() {
    env::remove_var("LEXDECK_TEST_SETTING");
    assert!(resolve_setting(None, "LEXDECK_TEST_SETTING", None).is_none());
}

#[test]
fn test_load_explicit_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
unsplash_access_key = "key-123"
anki_base_folder = "/data/Anki2"
audio_strategy = "synthesized"
"#,
    )
    .unwrap();

    let (config, origin) = load_config(Some(&path)).unwrap();

    assert_eq!(origin, ConfigOrigin::File(path.clone()));
    assert_eq!(config.unsplash_access_key.as_deref(), Some("key-123"));
    assert_eq!(config.anki_base_folder.as_deref(), Some("/data/Anki2"));
    assert_eq!(config.audio_strategy.as_deref(), Some("synthesized"));
}

#[test]
fn test_explicit_missing_config_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.toml");

    assert!(matches!(load_config(Some(&path)), Err(Error::NotFound(_))));
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_missing_default_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let previous = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", temp_dir.path());

    let (config, origin) = load_config(None).unwrap();

    match previous {
        Some(value) => env::set_var("XDG_CONFIG_HOME", value),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }
    assert_eq!(
        origin,
        ConfigOrigin::DefaultsMissingFile(temp_dir.path().join("lexdeck").join("config.toml"))
    );
    assert!(config.images_folder.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_unreadable_config_is_io_error() {
    let temp_dir = TempDir::new().unwrap();

    // A directory exists but cannot be read as a file
    assert!(matches!(load_toml_config(temp_dir.path()), Err(Error::Io(_))));
}

#[test]
fn test_malformed_toml_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    fs::write(&path, "images_folder = [unclosed").unwrap();

    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_expand_env_vars_all_syntaxes() {
    env::set_var("LEXDECK_TEST_HOME", "/home/learner");

    assert_eq!(expand_env_vars("$LEXDECK_TEST_HOME/Anki2"), "/home/learner/Anki2");
    assert_eq!(expand_env_vars("${LEXDECK_TEST_HOME}/Anki2"), "/home/learner/Anki2");
    assert_eq!(expand_env_vars("%LEXDECK_TEST_HOME%\\Anki2"), "/home/learner\\Anki2");

    env::remove_var("LEXDECK_TEST_HOME");
}

#[test]
#[serial]
fn test_expand_env_vars_leaves_unknown_untouched() {
    env::remove_var("LEXDECK_TEST_UNSET");
    assert_eq!(expand_env_vars("$LEXDECK_TEST_UNSET/x"), "$LEXDECK_TEST_UNSET/x");
    assert_eq!(expand_env_vars("plain/path"), "plain/path");
}
