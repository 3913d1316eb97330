//! Application data root.

use std::env;
use std::fs;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the data root.
pub const ENV_DATA_DIR: &str = "LOGDECK_DATA_DIR";

/// Get the root directory for application data (settings, logs).
///
/// Resolution order:
/// 1. `LOGDECK_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/logdeck`)
///
/// The directory is created if it does not exist.
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = data_root_with(env::var(ENV_DATA_DIR).ok(), dirs::data_local_dir())?;

    if !root.exists() {
        fs::create_dir_all(&root).map_err(|e| PathError::CreateFailed {
            path: root.clone(),
            reason: e.to_string(),
        })?;
    } else if !root.is_dir() {
        return Err(PathError::NotADirectory(root));
    }

    Ok(root)
}

/// Pure resolution rule behind `data_root`.
pub fn data_root_with(
    env_override: Option<String>,
    system_data_dir: Option<PathBuf>,
) -> Result<PathBuf, PathError> {
    if let Some(path) = env_override {
        if path.trim().is_empty() {
            return Err(PathError::EmptyPath);
        }
        return Ok(PathBuf::from(path));
    }

    let data_dir = system_data_dir.ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("logdeck"))
}
