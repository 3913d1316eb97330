//! Log source tracker.
//!
//! Keeps the set of tailed files of each group equal to the union of the
//! stdout/stderr paths in that group's latest registry snapshot.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{LogGroup, RegistrySnapshot, TailId, TailPolicies, TailRequest};
use crate::ports::{TailHandle, TailSourcePort};

/// Health of a tracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailStatus {
    Active,
    /// The tail reported a read failure and has not recovered yet.
    Errored { reason: String },
}

struct TrackedFile {
    id: TailId,
    status: TailStatus,
    handle: Box<dyn TailHandle>,
}

/// Paths started and stopped by one `reconcile` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub started: Vec<String>,
    pub stopped: Vec<String>,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.started.is_empty() && self.stopped.is_empty()
    }
}

/// Reconciles tailed files against registry snapshots, per group.
pub struct LogSourceTracker {
    source: Arc<dyn TailSourcePort>,
    policies: TailPolicies,
    tracked: [BTreeMap<String, TrackedFile>; 2],
    index: HashMap<TailId, (LogGroup, String)>,
    next_id: u64,
}

impl LogSourceTracker {
    pub fn new(source: Arc<dyn TailSourcePort>, policies: TailPolicies) -> Self {
        Self {
            source,
            policies,
            tracked: [BTreeMap::new(), BTreeMap::new()],
            index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Bring the tracked files of `group` in line with `snapshot`.
    ///
    /// Files no longer listed are stopped and forgotten; newly listed files
    /// start tailing with the group's initial offset policy. Calling this
    /// twice with the same snapshot starts and stops nothing the second time.
    pub fn reconcile(&mut self, group: LogGroup, snapshot: &RegistrySnapshot) -> ReconcileOutcome {
        let desired = snapshot.desired_paths();
        let mut outcome = ReconcileOutcome::default();

        let stale: Vec<String> = self.tracked[group.index()]
            .keys()
            .filter(|path| !desired.contains(*path))
            .cloned()
            .collect();

        for path in stale {
            if let Some(mut file) = self.tracked[group.index()].remove(&path) {
                file.handle.stop();
                self.index.remove(&file.id);
                debug!(%group, %path, tail = %file.id, "Stopped tailing");
                outcome.stopped.push(path);
            }
        }

        let config = self.policies.for_group(group);
        for path in desired {
            if self.tracked[group.index()].contains_key(&path) {
                continue;
            }

            let id = self.allocate_id();
            let request = TailRequest {
                id,
                group,
                path: path.clone(),
                initial_offset: config.initial_offset,
                poll_interval: config.poll_interval,
            };
            let handle = self.source.start_tail(request);
            debug!(%group, %path, tail = %id, policy = ?config.initial_offset, "Started tailing");

            self.index.insert(id, (group, path.clone()));
            self.tracked[group.index()].insert(
                path.clone(),
                TrackedFile {
                    id,
                    status: TailStatus::Active,
                    handle,
                },
            );
            outcome.started.push(path);
        }

        if !outcome.is_noop() {
            info!(
                %group,
                started = outcome.started.len(),
                stopped = outcome.stopped.len(),
                tracked = self.tracked[group.index()].len(),
                "Reconciled log sources"
            );
        }

        outcome
    }

    /// Paths currently tailed for a group, sorted.
    pub fn tracked_paths(&self, group: LogGroup) -> Vec<String> {
        self.tracked[group.index()].keys().cloned().collect()
    }

    pub fn tracked_count(&self, group: LogGroup) -> usize {
        self.tracked[group.index()].len()
    }

    /// Whether `id` belongs to a tail that is still tracked.
    ///
    /// Events from stopped tails may still be queued; callers drop them when
    /// this returns `false`.
    pub fn is_current(&self, id: TailId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn group_of(&self, id: TailId) -> Option<LogGroup> {
        self.index.get(&id).map(|(group, _)| *group)
    }

    pub fn status(&self, group: LogGroup, path: &str) -> Option<&TailStatus> {
        self.tracked[group.index()].get(path).map(|file| &file.status)
    }

    /// Record a read failure. The file stays tracked; its tail keeps polling.
    pub fn mark_errored(&mut self, id: TailId, reason: impl Into<String>) -> bool {
        let Some(file) = self.file_mut(id) else {
            return false;
        };
        let reason = reason.into();
        warn!(tail = %id, %reason, "Log file is not readable; tail keeps retrying");
        file.status = TailStatus::Errored { reason };
        true
    }

    /// Record that a failing tail reads again.
    pub fn mark_recovered(&mut self, id: TailId) -> bool {
        let Some(file) = self.file_mut(id) else {
            return false;
        };
        if file.status != TailStatus::Active {
            info!(tail = %id, "Log file readable again");
        }
        file.status = TailStatus::Active;
        true
    }

    /// Stop every tail of both groups. Returns how many were stopped.
    pub fn stop_all(&mut self) -> usize {
        let mut stopped = 0;
        for files in &mut self.tracked {
            for (_, mut file) in std::mem::take(files) {
                file.handle.stop();
                stopped += 1;
            }
        }
        self.index.clear();
        stopped
    }

    fn file_mut(&mut self, id: TailId) -> Option<&mut TrackedFile> {
        let (group, path) = self.index.get(&id)?;
        self.tracked[group.index()].get_mut(path)
    }

    fn allocate_id(&mut self) -> TailId {
        let id = TailId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Drop for LogSourceTracker {
    fn drop(&mut self) {
        self.stop_all();
    }
}
