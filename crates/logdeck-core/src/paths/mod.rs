//! Path utilities for logdeck data directories.
//!
//! This module provides the canonical path resolution for all logdeck
//! components:
//! - Application data root
//! - Server log directory
//! - Settings and `.env` files
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Environment lookups are isolated in thin wrappers; the resolution rules
//!   themselves are pure functions

mod config;
mod error;
mod logs;
mod platform;
mod resolver;

pub use config::{env_file_path, load_settings, settings_path};
pub use error::PathError;
pub use logs::{
    ENV_LOG_DIR, LOG_DIR_NAME, LogDirResolution, LogDirSource, resolve_log_dir,
    resolve_log_dir_with,
};
pub use platform::{ENV_DATA_DIR, data_root, data_root_with};
pub use resolver::ResolvedPaths;
