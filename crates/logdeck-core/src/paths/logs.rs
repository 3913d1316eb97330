//! Server log directory resolution.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::data_root;

/// Environment variable overriding the log directory.
pub const ENV_LOG_DIR: &str = "LOGDECK_LOG_DIR";

/// Name of the log directory under the data root.
pub const LOG_DIR_NAME: &str = "logs";

/// How the log directory was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDirSource {
    /// The user passed an explicit path (e.g. `--log-dir`).
    Explicit,
    /// The path came from `LOGDECK_LOG_DIR` / `.env`.
    EnvVar,
    /// `<data root>/logs`.
    Default,
}

/// Resolution result for the log directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirResolution {
    pub path: PathBuf,
    pub source: LogDirSource,
}

/// Resolve the directory the server processes write their logs to.
///
/// Resolution order:
/// 1. `explicit` (e.g. a `--log-dir` flag)
/// 2. `LOGDECK_LOG_DIR` environment variable (ignored when blank)
/// 3. `<data root>/logs`
///
/// The directory is not created; a missing directory simply has no processes.
pub fn resolve_log_dir(explicit: Option<&Path>) -> Result<LogDirResolution, PathError> {
    if let Some(path) = explicit {
        return resolve_log_dir_with(Some(path), None, Path::new(""));
    }
    match env::var(ENV_LOG_DIR) {
        Ok(value) if !value.trim().is_empty() => {
            resolve_log_dir_with(None, Some(value), Path::new(""))
        }
        _ => resolve_log_dir_with(None, None, &data_root()?),
    }
}

/// Pure resolution rule behind `resolve_log_dir`.
pub fn resolve_log_dir_with(
    explicit: Option<&Path>,
    env_value: Option<String>,
    data_root: &Path,
) -> Result<LogDirResolution, PathError> {
    if let Some(path) = explicit {
        if path.as_os_str().is_empty() {
            return Err(PathError::EmptyPath);
        }
        return Ok(LogDirResolution {
            path: path.to_path_buf(),
            source: LogDirSource::Explicit,
        });
    }
    if let Some(value) = env_value {
        if value.trim().is_empty() {
            return Err(PathError::EmptyPath);
        }
        return Ok(LogDirResolution {
            path: PathBuf::from(value),
            source: LogDirSource::EnvVar,
        });
    }
    Ok(LogDirResolution {
        path: data_root.join(LOG_DIR_NAME),
        source: LogDirSource::Default,
    })
}
