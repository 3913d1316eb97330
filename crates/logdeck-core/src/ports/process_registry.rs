//! Process registry port.
//!
//! A registry enumerates the running processes of one group together with
//! the files their stdout/stderr are captured to, and announces changes.

use tokio::sync::broadcast;

use super::RegistryError;
use crate::domain::{LogGroup, RegistrySnapshot};

/// Notification that a registry's process list may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryUpdate {
    pub group: LogGroup,
}

/// Port for a per-group process registry.
///
/// The viewer never polls a registry on its own: it reads `get_logs` once at
/// start-up and again after every `updated` notification. Dropping the
/// receiver returned by `subscribe` unsubscribes.
pub trait ProcessRegistryPort: Send + Sync {
    /// Group whose processes this registry reports.
    fn group(&self) -> LogGroup;

    /// Current mapping from process id to log files.
    fn get_logs(&self) -> Result<RegistrySnapshot, RegistryError>;

    /// Subscribe to `updated` notifications.
    fn subscribe(&self) -> broadcast::Receiver<RegistryUpdate>;
}
