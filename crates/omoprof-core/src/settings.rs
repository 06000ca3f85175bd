//! Application settings
//!
//! Settings live in `settings.json` under the omoprof home directory, which
//! is `$OMOPROF_HOME` when set and `<config dir>/omoprof` otherwise. Every
//! field has a default, so a missing file is not an error; a corrupt file is
//! backed up and replaced by defaults.

use crate::recovery::{read_json_or_default, Recovered};
use crate::util::write_atomic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the omoprof home directory
pub const HOME_ENV: &str = "OMOPROF_HOME";

/// Settings file name inside the home directory
const SETTINGS_FILE: &str = "settings.json";

/// Default models.dev catalog endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://models.dev/api.json";

/// Default location of the published oh-my-opencode schema
pub const DEFAULT_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/code-yeongyu/oh-my-opencode/master/assets/oh-my-opencode.schema.json";

/// Default network timeout in seconds
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Errors resolving or persisting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// User-adjustable settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding profiles (default: `<home>/profiles`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles_dir: Option<PathBuf>,
    /// The live oh-my-opencode config (default: `~/.config/opencode/oh-my-opencode.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_config: Option<PathBuf>,
    pub catalog_url: String,
    pub schema_url: String,
    pub fetch_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profiles_dir: None,
            target_config: None,
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            schema_url: DEFAULT_SCHEMA_URL.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// The omoprof home directory
    ///
    /// # Errors
    /// Returns an error if `OMOPROF_HOME` is unset and no config dir exists
    pub fn home_dir() -> Result<PathBuf, SettingsError> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        dirs::config_dir()
            .map(|dir| dir.join("omoprof"))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load settings from `home`, recovering from a corrupt file
    ///
    /// # Errors
    /// Returns an error only if the file cannot be read or backed up
    pub fn load_from(home: &Path) -> Result<Recovered<Self>, SettingsError> {
        let path = home.join(SETTINGS_FILE);
        read_json_or_default(&path).map_err(|e| SettingsError::Io {
            path,
            message: e.to_string(),
        })
    }

    /// Write settings to `home`
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to(&self, home: &Path) -> Result<(), SettingsError> {
        let path = home.join(SETTINGS_FILE);
        let content = serde_json::to_string_pretty(self).map_err(|e| SettingsError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        write_atomic(&path, content.as_bytes()).map_err(|e| SettingsError::Io {
            path,
            message: e.to_string(),
        })
    }

    /// Resolved profiles directory
    #[must_use]
    pub fn profiles_dir(&self, home: &Path) -> PathBuf {
        self.profiles_dir
            .clone()
            .unwrap_or_else(|| home.join("profiles"))
    }

    /// Resolved live config path
    ///
    /// # Errors
    /// Returns an error if no target is configured and there is no home directory
    pub fn target_config(&self) -> Result<PathBuf, SettingsError> {
        if let Some(target) = &self.target_config {
            return Ok(target.clone());
        }
        let home = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;
        Ok(home
            .join(".config")
            .join("opencode")
            .join("oh-my-opencode.json"))
    }

    /// Directory for TUI log files
    #[must_use]
    pub fn log_dir(home: &Path) -> PathBuf {
        home.join("logs")
    }

    /// Network timeout as a duration
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}
