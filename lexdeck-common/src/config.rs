//! Configuration loading and setting resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default (applied by the caller)
//!
//! A missing TOML file is never fatal: the tools start with defaults and a warning.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Application directory name under the platform config dir
const APP_DIR: &str = "lexdeck";

/// Config file name inside [`APP_DIR`]
const CONFIG_FILE: &str = "config.toml";

static ENV_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)|%([A-Za-z_][A-Za-z0-9_]*)%")
        .expect("static regex")
});

/// Bootstrap configuration loaded from TOML file
///
/// All fields are optional; anything absent falls through to the built-in default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Unsplash API access key used for image search
    #[serde(default)]
    pub unsplash_access_key: Option<String>,

    /// Root folder holding one subdirectory per flashcard profile
    #[serde(default)]
    pub anki_base_folder: Option<String>,

    /// Local directory for downloaded images
    #[serde(default)]
    pub images_folder: Option<String>,

    /// Local directory for downloaded or synthesized audio
    #[serde(default)]
    pub audios_folder: Option<String>,

    /// Audio strategy: "dictionary" or "synthesized"
    #[serde(default)]
    pub audio_strategy: Option<String>,

    /// Language of the input text (translation source)
    #[serde(default)]
    pub source_language: Option<String>,

    /// Translation target language
    #[serde(default)]
    pub target_language: Option<String>,

    /// Per-request network timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Upper bound on dictionary page requests per second
    #[serde(default)]
    pub dictionary_requests_per_second: Option<u32>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where a resolved setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    CommandLine,
    Environment,
    TomlFile,
}

impl SettingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingSource::CommandLine => "command line",
            SettingSource::Environment => "environment",
            SettingSource::TomlFile => "TOML",
        }
    }
}

/// A setting value together with every source that offered one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSetting {
    /// Value from the highest-priority source
    pub value: String,
    /// Source the value was taken from
    pub source: SettingSource,
    /// All sources that carried a usable value, highest priority first
    pub offered_by: Vec<SettingSource>,
}

/// Resolve one string setting from CLI → ENV → TOML
///
/// Blank or whitespace-only values count as absent at every tier.
/// Returns `None` when no tier has a usable value; the caller applies its default.
pub fn resolve_setting(
    cli_value: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Option<ResolvedSetting> {
    let env_value = std::env::var(env_var_name).ok();

    let candidates = [
        (SettingSource::CommandLine, cli_value),
        (SettingSource::Environment, env_value.as_deref()),
        (SettingSource::TomlFile, toml_value),
    ];

    let offered: Vec<(SettingSource, &str)> = candidates
        .iter()
        .filter_map(|(source, value)| value.filter(|v| is_valid_value(v)).map(|v| (*source, v)))
        .collect();

    let (source, value) = *offered.first()?;
    debug!(env_var = env_var_name, source = source.as_str(), "Resolved setting");

    Some(ResolvedSetting {
        value: value.trim().to_string(),
        source,
        offered_by: offered.iter().map(|(s, _)| *s).collect(),
    })
}

/// Validate a setting value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Default config file location for the platform
///
/// `~/.config/lexdeck/config.toml` on Linux, the equivalent application
/// config directory elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Where the bootstrap configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from this file
    File(PathBuf),
    /// Default location had no file; built-in defaults apply
    DefaultsMissingFile(PathBuf),
    /// No platform config directory; built-in defaults apply
    DefaultsNoConfigDir,
}

impl ConfigOrigin {
    /// Report the origin once logging is initialized
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => {
                info!(path = %path.display(), "Loaded configuration");
            }
            ConfigOrigin::DefaultsMissingFile(path) => {
                warn!(
                    path = %path.display(),
                    "No config file found, using environment and built-in defaults"
                );
            }
            ConfigOrigin::DefaultsNoConfigDir => {
                warn!("Could not determine config directory, using environment and built-in defaults");
            }
        }
    }
}

/// Load the bootstrap configuration
///
/// An explicitly requested file must exist and parse. The default location is
/// optional: when it is absent the built-in defaults are used. Nothing is
/// logged here since this runs before the subscriber exists; callers pass the
/// returned [`ConfigOrigin`] to [`ConfigOrigin::log`] afterwards.
pub fn load_config(explicit_path: Option<&Path>) -> Result<(TomlConfig, ConfigOrigin)> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            return Err(Error::NotFound(format!("config file {}", path.display())));
        }
        let config = load_toml_config(path)?;
        return Ok((config, ConfigOrigin::File(path.to_path_buf())));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            Ok((config, ConfigOrigin::File(path)))
        }
        Some(path) => Ok((TomlConfig::default(), ConfigOrigin::DefaultsMissingFile(path))),
        None => Ok((TomlConfig::default(), ConfigOrigin::DefaultsNoConfigDir)),
    }
}

/// Expand `$VAR`, `${VAR}` and `%VAR%` references from the process environment
///
/// Unknown variables are left untouched.
pub fn expand_env_vars(raw: &str) -> String {
    ENV_REFERENCE
        .replace_all(raw, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
