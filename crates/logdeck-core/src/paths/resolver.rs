//! Resolution of every path logdeck uses, captured at once.

use std::fmt;
use std::path::{Path, PathBuf};

use super::config::{env_file_path, settings_path};
use super::error::PathError;
use super::logs::{LogDirSource, resolve_log_dir};
use super::platform::data_root;

/// All resolved paths, for diagnostics (`logdeck paths`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root directory for application data.
    pub data_root: PathBuf,
    /// `settings.json` location (may not exist).
    pub settings_path: PathBuf,
    /// `.env` location (may not exist).
    pub env_file: PathBuf,
    /// Directory the server processes write their logs to.
    pub log_dir: PathBuf,
    /// How the log directory was determined.
    pub log_dir_source: LogDirSource,
}

impl ResolvedPaths {
    /// Resolve all paths, honouring an explicit log directory override.
    pub fn resolve(log_dir: Option<&Path>) -> Result<Self, PathError> {
        let log_dir = resolve_log_dir(log_dir)?;
        Ok(Self {
            data_root: data_root()?,
            settings_path: settings_path()?,
            env_file: env_file_path()?,
            log_dir: log_dir.path,
            log_dir_source: log_dir.source,
        })
    }
}

impl fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "settings_path = {}", self.settings_path.display())?;
        writeln!(f, "env_file = {}", self.env_file.display())?;
        writeln!(f, "log_dir = {}", self.log_dir.display())?;
        write!(f, "log_dir_source = {:?}", self.log_dir_source)
    }
}
