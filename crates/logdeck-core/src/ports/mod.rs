//! Port definitions (trait abstractions) for external collaborators.
//!
//! Ports define the interfaces that the viewer services expect from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No filesystem polling or terminal details in any signature
//! - Event delivery goes through sink traits, not channel types
//! - Render instructions are fire-and-forget; views handle their own I/O errors

pub mod log_view;
pub mod process_registry;
pub mod tail_source;

use std::path::PathBuf;

use thiserror::Error;

pub use log_view::{LogViewPort, NoopLogView};
pub use process_registry::{ProcessRegistryPort, RegistryUpdate};
pub use tail_source::{TailEventSink, TailHandle, TailSourcePort};

#[cfg(test)]
pub use log_view::MockLogViewPort;

/// Errors raised while enumerating the processes of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry cannot be queried right now.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    /// The registry's backing directory could not be read.
    #[error("Failed to read {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

/// Errors raised by a tail while reading its file.
///
/// These are reported through `TailEvent::Error`; they never stop the poll loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TailError {
    /// The file could not be stat'ed (missing, permission denied).
    #[error("Cannot stat {path}: {reason}")]
    Stat { path: String, reason: String },

    /// The file could not be opened.
    #[error("Cannot open {path}: {reason}")]
    Open { path: String, reason: String },

    /// Reading new bytes failed.
    #[error("Read failed for {path}: {reason}")]
    Read { path: String, reason: String },
}

impl TailError {
    pub fn path(&self) -> &str {
        match self {
            Self::Stat { path, .. } | Self::Open { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Path resolution error.
    #[error(transparent)]
    Path(#[from] crate::paths::PathError),
}
