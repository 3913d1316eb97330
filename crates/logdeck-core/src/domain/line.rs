//! Log line events.

use serde::{Deserialize, Serialize};

use super::group::LogGroup;

/// A single complete line read from a tailed file.
///
/// The text never contains the terminating line feed (or a `\r` before it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Group of the file the line came from.
    pub group: LogGroup,
    /// Line content.
    pub text: String,
}

impl LogLine {
    pub fn new(group: LogGroup, text: impl Into<String>) -> Self {
        Self {
            group,
            text: text.into(),
        }
    }
}

/// Normalize platform path separators to forward slashes.
///
/// Registries on Windows report paths with `\`; tracked paths are compared
/// after normalization so the same file is never tailed twice.
pub fn normalize_path(raw: &str) -> String {
    raw.replace('\\', "/")
}
