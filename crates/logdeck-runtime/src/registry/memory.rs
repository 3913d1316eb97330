//! Registry whose snapshot is set by the embedding application.

use std::sync::{PoisonError, RwLock};

use logdeck_core::{
    LogGroup, ProcessLogs, ProcessRegistryPort, RegistryError, RegistrySnapshot, RegistryUpdate,
};
use tokio::sync::broadcast;
use tracing::debug;

use super::UPDATE_CHANNEL_CAPACITY;

/// Process registry backed by an in-memory snapshot.
///
/// Every mutation broadcasts `updated`, whether or not anyone listens.
pub struct InMemoryProcessRegistry {
    group: LogGroup,
    snapshot: RwLock<RegistrySnapshot>,
    sender: broadcast::Sender<RegistryUpdate>,
}

impl InMemoryProcessRegistry {
    pub fn new(group: LogGroup) -> Self {
        Self::with_snapshot(group, RegistrySnapshot::new())
    }

    pub fn with_snapshot(group: LogGroup, snapshot: RegistrySnapshot) -> Self {
        let (sender, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            group,
            snapshot: RwLock::new(snapshot),
            sender,
        }
    }

    /// Add or replace a process entry.
    pub fn set_process(&self, process_id: impl Into<String>, logs: ProcessLogs) {
        let process_id = process_id.into();
        debug!(group = %self.group, process = %process_id, "Process registered");
        self.write().insert(process_id, logs);
        self.notify();
    }

    /// Remove a process entry. Returns false if it was not registered.
    pub fn remove_process(&self, process_id: &str) -> bool {
        let removed = self.write().remove(process_id).is_some();
        if removed {
            debug!(group = %self.group, process = %process_id, "Process removed");
            self.notify();
        }
        removed
    }

    /// Replace the whole snapshot.
    pub fn replace(&self, snapshot: RegistrySnapshot) {
        *self.write() = snapshot;
        self.notify();
    }

    /// Number of `updated` subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn notify(&self) {
        let _ = self.sender.send(RegistryUpdate { group: self.group });
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistrySnapshot> {
        self.snapshot.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProcessRegistryPort for InMemoryProcessRegistry {
    fn group(&self) -> LogGroup {
        self.group
    }

    fn get_logs(&self) -> Result<RegistrySnapshot, RegistryError> {
        Ok(self
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<RegistryUpdate> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutations_broadcast_updates() {
        let registry = InMemoryProcessRegistry::new(LogGroup::DomainServer);
        let mut rx = registry.subscribe();

        registry.set_process("1", ProcessLogs::new("/l/ds-out", "/l/ds-err"));
        assert_eq!(
            rx.try_recv().unwrap(),
            RegistryUpdate {
                group: LogGroup::DomainServer
            }
        );
        assert_eq!(registry.get_logs().unwrap().len(), 1);

        assert!(registry.remove_process("1"));
        assert!(rx.try_recv().is_ok());
        assert!(registry.get_logs().unwrap().is_empty());
    }

    #[test]
    fn test_removing_unknown_process_is_silent() {
        let registry = InMemoryProcessRegistry::new(LogGroup::AssignmentClient);
        let mut rx = registry.subscribe();

        assert!(!registry.remove_process("missing"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropping_receiver_unsubscribes() {
        let registry = InMemoryProcessRegistry::new(LogGroup::AssignmentClient);
        let rx = registry.subscribe();
        assert_eq!(registry.subscriber_count(), 1);
        drop(rx);
        assert_eq!(registry.subscriber_count(), 0);
    }
}
