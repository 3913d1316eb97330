//! Settings and `.env` file locations, and settings loading.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::PathError;
use super::platform::data_root;
use crate::settings::{SettingsError, ViewerSettings};

/// Path of the settings file: `<data root>/settings.json`.
pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("settings.json"))
}

/// Path of the `.env` file: `<data root>/.env`.
pub fn env_file_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(".env"))
}

/// Load settings from a JSON file.
///
/// A missing file yields the defaults. Values are not range-checked here;
/// callers run `validate_settings` once every override has been applied.
pub fn load_settings(path: &Path) -> Result<ViewerSettings, SettingsError> {
    let settings = match fs::read_to_string(path) {
        Ok(contents) => {
            serde_json::from_str(&contents).map_err(|e| SettingsError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No settings file, using defaults");
            ViewerSettings::default()
        }
        Err(e) => {
            return Err(SettingsError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            });
        }
    };

    Ok(settings)
}
