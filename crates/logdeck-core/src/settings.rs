//! Viewer settings and validation.
//!
//! Pure domain types: loading from disk lives in `paths::config`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{MAX_RETAINED_LINES, TailPolicies};

/// Default tail poll cadence.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default window of an assignment-client log shown when tailing starts.
pub const DEFAULT_TAIL_WINDOW_BYTES: u64 = 25_000;

/// Default interval between log directory rescans.
pub const DEFAULT_RESCAN_INTERVAL_MS: u64 = 1_000;

/// Default age after which old log files are swept.
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

/// Environment variable overriding `poll_interval_ms`.
pub const ENV_POLL_INTERVAL_MS: &str = "LOGDECK_POLL_INTERVAL_MS";

/// Environment variable overriding `max_retained_lines`.
pub const ENV_MAX_LINES: &str = "LOGDECK_MAX_LINES";

/// Viewer settings.
///
/// Missing fields in a settings file fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewerSettings {
    /// Lines retained per tab before the oldest is evicted.
    pub max_retained_lines: usize,

    /// How often each tailed file is polled for growth.
    pub poll_interval_ms: u64,

    /// Bytes of an existing assignment-client log shown when tailing starts.
    pub tail_window_bytes: u64,

    /// How often the log directory is rescanned for new processes.
    pub rescan_interval_ms: u64,

    /// Log files older than this many days are deleted by `sweep`.
    pub retention_days: u64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            max_retained_lines: MAX_RETAINED_LINES,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            tail_window_bytes: DEFAULT_TAIL_WINDOW_BYTES,
            rescan_interval_ms: DEFAULT_RESCAN_INTERVAL_MS,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl ViewerSettings {
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub const fn rescan_interval(&self) -> Duration {
        Duration::from_millis(self.rescan_interval_ms)
    }

    pub const fn retention_max_age(&self) -> Duration {
        Duration::from_secs(self.retention_days.saturating_mul(24 * 60 * 60))
    }

    /// Per-group tailing configuration derived from these settings.
    pub const fn tail_policies(&self) -> TailPolicies {
        TailPolicies::new(self.poll_interval(), self.tail_window_bytes)
    }

    /// Apply environment overrides.
    ///
    /// `lookup` is usually `|key| std::env::var(key).ok()`; taking it as a
    /// parameter keeps this testable without touching the process environment.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SettingsError> {
        if let Some(value) = lookup(ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = parse_env(ENV_POLL_INTERVAL_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_LINES) {
            self.max_retained_lines = parse_env(ENV_MAX_LINES, &value)?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidEnvValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Max retained lines must be between 1 and 1,000,000, got {0}")]
    InvalidMaxLines(usize),

    #[error("Poll interval must be between 10 and 60,000 ms, got {0}")]
    InvalidPollInterval(u64),

    #[error("Rescan interval must be between 100 and 600,000 ms, got {0}")]
    InvalidRescanInterval(u64),

    #[error("Retention must be at least one day")]
    InvalidRetention,

    #[error("Environment variable {key} has invalid value '{value}'")]
    InvalidEnvValue { key: String, value: String },

    #[error("Failed to read settings file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse settings file {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Validate settings.
pub fn validate_settings(settings: &ViewerSettings) -> Result<(), SettingsError> {
    if !(1..=1_000_000).contains(&settings.max_retained_lines) {
        return Err(SettingsError::InvalidMaxLines(settings.max_retained_lines));
    }
    if !(10..=60_000).contains(&settings.poll_interval_ms) {
        return Err(SettingsError::InvalidPollInterval(settings.poll_interval_ms));
    }
    if !(100..=600_000).contains(&settings.rescan_interval_ms) {
        return Err(SettingsError::InvalidRescanInterval(
            settings.rescan_interval_ms,
        ));
    }
    if settings.retention_days == 0 {
        return Err(SettingsError::InvalidRetention);
    }
    Ok(())
}
