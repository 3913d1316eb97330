//! Core domain types, port definitions and viewer services for logdeck.
//!
//! `logdeck` follows the stdout/stderr log files of a locally launched server
//! stack made of two process groups (domain-server and assignment-client) and
//! presents them as two bounded, filterable tabs.
//!
//! This crate holds everything that does not touch the filesystem poller or
//! the terminal:
//!
//! - `domain` - groups, log lines, registry snapshots, tab buffers, filter state
//! - `ports` - trait abstractions for registries, the tail source and the view
//! - `services` - the log source tracker and the log display controller
//! - `settings` - viewer settings and validation
//! - `paths` - data/log directory resolution

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    BufferedLine, FilterState, GroupTailConfig, InitialOffsetPolicy, LogGroup, LogLine,
    MAX_RETAINED_LINES, ParseGroupError, ProcessLogs, RegistrySnapshot, TabBuffer, TailEvent,
    TailId, TailPolicies, TailRequest, normalize_path,
};
pub use ports::{
    CoreError, LogViewPort, NoopLogView, ProcessRegistryPort, RegistryError, RegistryUpdate,
    TailError, TailEventSink, TailHandle, TailSourcePort,
};
pub use services::{
    LogDisplayController, LogSourceTracker, LogViewerState, ReconcileOutcome, TailStatus,
};
pub use settings::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_RESCAN_INTERVAL_MS, DEFAULT_RETENTION_DAYS,
    DEFAULT_TAIL_WINDOW_BYTES, SettingsError, ViewerSettings, validate_settings,
};

// Re-export path utilities
pub use paths::{
    LogDirResolution, LogDirSource, PathError, ResolvedPaths, data_root, env_file_path,
    load_settings, resolve_log_dir, settings_path,
};

#[cfg(test)]
use tempfile as _;
