//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from `CoreError` to exit codes and user-facing messages.

use logdeck_core::{CoreError, PathError, RegistryError, SettingsError};
use logdeck_runtime::SessionError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    /// Argument error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The viewer session failed.
    #[error("Session error: {0}")]
    Session(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Session(_) => 70,  // EX_SOFTWARE
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Registry(e) => Self::Io(e.to_string()),
            CoreError::Settings(e) => Self::Config(e.to_string()),
            CoreError::Path(e) => Self::Config(e.to_string()),
        }
    }
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        Self::from(CoreError::from(err))
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::from(CoreError::from(err))
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::from(CoreError::from(err))
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        Self::Session(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
