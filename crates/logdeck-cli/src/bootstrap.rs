//! CLI bootstrap - the composition root.
//!
//! Resolves paths, loads the `.env` file and the settings file, and applies
//! environment overrides. Command handlers receive the resulting context.

use std::path::{Path, PathBuf};

use logdeck_core::{
    ResolvedPaths, SettingsError, ViewerSettings, env_file_path, load_settings,
    validate_settings,
};
use tracing::debug;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Explicit log directory (`--log-dir`).
    pub log_dir: Option<PathBuf>,
}

impl CliConfig {
    pub const fn with_log_dir(log_dir: Option<PathBuf>) -> Self {
        Self { log_dir }
    }
}

/// Fully resolved configuration for CLI commands.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Effective viewer settings (file, then environment overrides).
    pub settings: ViewerSettings,
    /// Every path logdeck uses.
    pub paths: ResolvedPaths,
}

impl CliContext {
    pub fn log_dir(&self) -> &Path {
        &self.paths.log_dir
    }
}

/// Build the CLI context.
///
/// The data root `.env` is loaded first without overriding variables that
/// are already set, so it can supply `LOGDECK_LOG_DIR` and the settings
/// overrides.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let env_file = env_file_path()?;
    if env_file.exists() {
        dotenvy::from_path(&env_file)
            .map_err(|e| CliError::Config(format!("{}: {e}", env_file.display())))?;
        debug!(path = %env_file.display(), "Loaded .env file");
    }

    let paths = ResolvedPaths::resolve(config.log_dir.as_deref())?;
    let settings = effective_settings(&paths.settings_path, |key| std::env::var(key).ok())?;

    debug!(
        log_dir = %paths.log_dir.display(),
        source = ?paths.log_dir_source,
        ?settings,
        "Bootstrapped CLI context"
    );

    Ok(CliContext { settings, paths })
}

/// Settings from `path` with environment overrides applied and validated.
pub fn effective_settings(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ViewerSettings, SettingsError> {
    let mut settings = load_settings(path)?;
    settings.apply_env_overrides(lookup)?;
    validate_settings(&settings)?;
    Ok(settings)
}
