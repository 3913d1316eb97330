//! Process registry snapshots.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::line::normalize_path;

/// Log file paths reported for one running process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessLogs {
    /// Path of the captured standard output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    /// Path of the captured standard error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl ProcessLogs {
    /// Both streams present.
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: Some(stdout.into()),
            stderr: Some(stderr.into()),
        }
    }

    /// Iterate over the paths that are set.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.stdout.iter().chain(self.stderr.iter()).map(String::as_str)
    }
}

/// Mapping from process identifier to its log files, as reported by one registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrySnapshot {
    processes: BTreeMap<String, ProcessLogs>,
}

impl RegistrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the logs of a process.
    pub fn insert(&mut self, process_id: impl Into<String>, logs: ProcessLogs) {
        self.processes.insert(process_id.into(), logs);
    }

    pub fn remove(&mut self, process_id: &str) -> Option<ProcessLogs> {
        self.processes.remove(process_id)
    }

    pub fn get(&self, process_id: &str) -> Option<&ProcessLogs> {
        self.processes.get(process_id)
    }

    /// Mutable access, inserting empty logs for unknown processes.
    pub fn entry_mut(&mut self, process_id: impl Into<String>) -> &mut ProcessLogs {
        self.processes.entry(process_id.into()).or_default()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProcessLogs)> {
        self.processes.iter().map(|(id, logs)| (id.as_str(), logs))
    }

    /// Union of every stdout/stderr path, normalized.
    pub fn desired_paths(&self) -> BTreeSet<String> {
        self.processes
            .values()
            .flat_map(ProcessLogs::paths)
            .map(normalize_path)
            .collect()
    }
}

impl FromIterator<(String, ProcessLogs)> for RegistrySnapshot {
    fn from_iter<T: IntoIterator<Item = (String, ProcessLogs)>>(iter: T) -> Self {
        Self {
            processes: iter.into_iter().collect(),
        }
    }
}
