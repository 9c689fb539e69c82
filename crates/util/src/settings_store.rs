//! Locating and reading the navigator settings file.
//!
//! The file lives at `$NAVDECK_SETTINGS_PATH` when set, otherwise under the
//! platform config directory (`~/.config/navdeck/settings.json` on most
//! systems). A missing file means defaults; a file that fails to parse is
//! logged and also treated as defaults so a bad edit never blocks startup.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use navdeck_types::NavigatorSettings;
use thiserror::Error;
use tracing::warn;

use crate::expand_home;

/// Environment variable overriding the settings file location.
pub const SETTINGS_PATH_ENV: &str = "NAVDECK_SETTINGS_PATH";

/// Default filename for the settings document.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Error surfaced when the settings file exists but cannot be read.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves the settings path from the environment or the config directory.
pub fn default_settings_path() -> PathBuf {
    if let Ok(path) = env::var(SETTINGS_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_home(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("navdeck")
        .join(SETTINGS_FILE_NAME)
}

/// Reads settings from `path`, or from [`default_settings_path`] when `None`.
pub fn load_settings(path: Option<&Path>) -> Result<NavigatorSettings, SettingsError> {
    let resolved = path.map(Path::to_path_buf).unwrap_or_else(default_settings_path);
    match fs::read_to_string(&resolved) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => Ok(settings),
            Err(error) => {
                warn!(
                    path = %resolved.display(),
                    error = %error,
                    "Failed to parse navigator settings; using defaults"
                );
                Ok(NavigatorSettings::default())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(NavigatorSettings::default()),
        Err(error) => Err(SettingsError::Io(error)),
    }
}
