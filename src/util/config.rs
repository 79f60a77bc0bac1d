//! Provider settings: API credential, base URL and suggestion debounce.
//!
//! Settings live in `settings.json` under the platform config directory. The
//! `GEOAPIFY_API_KEY` environment variable (also read from a `.env` file)
//! overrides whatever key the file holds.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::infra::{geoapify::DEFAULT_BASE_URL, suggest::DEFAULT_DEBOUNCE};

pub const API_KEY_ENV: &str = "GEOAPIFY_API_KEY";

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "LogisticsCalculator";
const APP_NAME: &str = "LogisticsCalculator";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_delay_ms")]
    pub suggestion_delay_ms: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            suggestion_delay_ms: default_delay_ms(),
        }
    }
}

impl ProviderSettings {
    pub fn suggestion_delay(&self) -> Duration {
        Duration::from_millis(self.suggestion_delay_ms)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_delay_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    ConfigFile,
    Missing,
}

impl KeySource {
    pub fn describe(&self) -> &'static str {
        match self {
            KeySource::Environment => "from the GEOAPIFY_API_KEY environment variable",
            KeySource::ConfigFile => "from the settings file",
            KeySource::Missing => "not configured",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadedSettings {
    /// Effective settings, with the environment key applied.
    pub settings: ProviderSettings,
    pub key_source: KeySource,
    /// The key as stored in the settings file. This, not `settings.api_key`,
    /// is what the settings form edits and saves.
    pub file_api_key: Option<String>,
}

fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

pub fn settings_path_display() -> String {
    settings_file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "unavailable".to_string())
}

/// Load settings from disk and the environment. Never fails: a missing or
/// unreadable file yields defaults.
pub fn load_settings() -> LoadedSettings {
    dotenvy::dotenv().ok();

    let from_file = settings_file().and_then(|path| match fs::read_to_string(&path) {
        Ok(data) => Some(data),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read settings file");
            None
        }
    });

    let settings = match from_file.as_deref().map(parse_settings) {
        Some(Ok(settings)) => settings,
        Some(Err(err)) => {
            warn!(%err, "ignoring malformed settings file");
            ProviderSettings::default()
        }
        None => ProviderSettings::default(),
    };

    let loaded = apply_env_override(settings, std::env::var(API_KEY_ENV).ok());
    debug!(
        key_source = ?loaded.key_source,
        base_url = %loaded.settings.base_url,
        "settings loaded"
    );
    loaded
}

pub fn parse_settings(raw: &str) -> Result<ProviderSettings, SerdeError> {
    serde_json::from_str(raw)
}

/// Merge the environment key into file settings and record where the key came from.
pub fn apply_env_override(
    mut settings: ProviderSettings,
    env_key: Option<String>,
) -> LoadedSettings {
    settings.api_key = settings.api_key.filter(|key| !key.trim().is_empty());
    let file_api_key = settings.api_key.clone();

    let key_source = match env_key.filter(|key| !key.trim().is_empty()) {
        Some(key) => {
            settings.api_key = Some(key);
            KeySource::Environment
        }
        None if settings.api_key.is_some() => KeySource::ConfigFile,
        None => KeySource::Missing,
    };

    LoadedSettings {
        settings,
        key_source,
        file_api_key,
    }
}

pub fn save_settings(settings: &ProviderSettings) -> Result<(), ConfigError> {
    let path = settings_file().ok_or(ConfigError::StorageUnavailable)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
