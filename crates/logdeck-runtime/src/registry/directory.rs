//! Registry derived from the server log directory.
//!
//! Launched processes write `<prefix>-<process id>-stdout.txt` and
//! `<prefix>-<process id>-stderr.txt` into one directory. The prefix names
//! the group: `domain-server` for domain-server processes, `ac-monitor` and
//! `ac` for assignment clients.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use std::time::Duration;

use logdeck_core::{
    LogGroup, ProcessRegistryPort, RegistryError, RegistrySnapshot, RegistryUpdate,
};
use regex::Regex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::UPDATE_CHANNEL_CAPACITY;
use crate::tail::MIN_POLL_INTERVAL;

static LOG_FILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(domain-server|ac-monitor|ac)-(.+)-std(out|err)\.txt$")
        .expect("log file pattern is valid")
});

/// Which captured stream a log file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

/// A parsed log file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileName {
    pub group: LogGroup,
    /// `<prefix>-<id>`, unique across prefixes of the same group.
    pub process_id: String,
    pub stream: LogStream,
}

/// Parse a file name such as `domain-server-1700000000-stdout.txt`.
pub fn parse_log_file_name(name: &str) -> Option<LogFileName> {
    let caps = LOG_FILE_REGEX.captures(name)?;
    let prefix = caps.get(1)?.as_str();
    let id = caps.get(2)?.as_str();

    let group = if prefix == "domain-server" {
        LogGroup::DomainServer
    } else {
        LogGroup::AssignmentClient
    };
    let stream = if caps.get(3)?.as_str() == "out" {
        LogStream::Stdout
    } else {
        LogStream::Stderr
    };

    Some(LogFileName {
        group,
        process_id: format!("{prefix}-{id}"),
        stream,
    })
}

/// Whether `name` is a server log file name.
pub fn is_log_file_name(name: &str) -> bool {
    LOG_FILE_REGEX.is_match(name)
}

/// Build the snapshot of `group` from the files in `dir`.
///
/// A missing directory yields an empty snapshot.
pub fn scan_log_directory(dir: &Path, group: LogGroup) -> Result<RegistrySnapshot, RegistryError> {
    let io_err = |e: std::io::Error| RegistryError::Io {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RegistrySnapshot::new()),
        Err(e) => return Err(io_err(e)),
    };

    let mut snapshot = RegistrySnapshot::new();
    for entry in entries {
        let entry = entry.map_err(io_err)?;
        let file_name = entry.file_name();
        let Some(parsed) = file_name.to_str().and_then(parse_log_file_name) else {
            continue;
        };
        if parsed.group != group {
            continue;
        }
        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path().to_string_lossy().into_owned();
        let logs = snapshot.entry_mut(parsed.process_id);
        match parsed.stream {
            LogStream::Stdout => logs.stdout = Some(path),
            LogStream::Stderr => logs.stderr = Some(path),
        }
    }

    Ok(snapshot)
}

/// Process registry that reports the log files present in a directory.
///
/// `get_logs` returns the result of the last scan; `rescan` refreshes it and
/// broadcasts `updated` only when the result changed.
pub struct LogDirectoryRegistry {
    group: LogGroup,
    dir: PathBuf,
    last_scan: RwLock<Result<RegistrySnapshot, RegistryError>>,
    sender: broadcast::Sender<RegistryUpdate>,
}

impl LogDirectoryRegistry {
    /// Create the registry and perform the first scan.
    pub fn open(dir: impl Into<PathBuf>, group: LogGroup) -> Self {
        let dir = dir.into();
        let (sender, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let last_scan = scan_log_directory(&dir, group);
        if let Err(e) = &last_scan {
            warn!(group = %group, error = %e, "Initial log directory scan failed");
        }

        Self {
            group,
            dir,
            last_scan: RwLock::new(last_scan),
            sender,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Scan the directory again. Returns true if the snapshot changed.
    pub fn rescan(&self) -> bool {
        let scan = scan_log_directory(&self.dir, self.group);

        let changed = {
            let mut last = self
                .last_scan
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if *last == scan {
                false
            } else {
                if let Err(e) = &scan {
                    warn!(group = %self.group, error = %e, "Log directory scan failed");
                }
                *last = scan;
                true
            }
        };

        if changed {
            debug!(group = %self.group, dir = %self.dir.display(), "Log directory changed");
            let _ = self.sender.send(RegistryUpdate { group: self.group });
        }
        changed
    }

    /// Rescan every `period` until `cancel` fires.
    ///
    /// Periods shorter than `MIN_POLL_INTERVAL` are raised to it.
    pub fn spawn_watcher(
        self: &Arc<Self>,
        period: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval(period.max(MIN_POLL_INTERVAL));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            debug!(group = %registry.group, "Starting log directory watcher");
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        registry.rescan();
                    }
                }
            }
            debug!(group = %registry.group, "Log directory watcher cancelled");
        })
    }
}

impl ProcessRegistryPort for LogDirectoryRegistry {
    fn group(&self) -> LogGroup {
        self.group
    }

    fn get_logs(&self) -> Result<RegistrySnapshot, RegistryError> {
        self.last_scan
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<RegistryUpdate> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_log_file_names() {
        let parsed = parse_log_file_name("domain-server-1700-stdout.txt").unwrap();
        assert_eq!(parsed.group, LogGroup::DomainServer);
        assert_eq!(parsed.process_id, "domain-server-1700");
        assert_eq!(parsed.stream, LogStream::Stdout);

        let parsed = parse_log_file_name("ac-monitor-9-stderr.txt").unwrap();
        assert_eq!(parsed.group, LogGroup::AssignmentClient);
        assert_eq!(parsed.process_id, "ac-monitor-9");
        assert_eq!(parsed.stream, LogStream::Stderr);

        let parsed = parse_log_file_name("ac-audio-mixer-3-stdout.txt").unwrap();
        assert_eq!(parsed.group, LogGroup::AssignmentClient);
        assert_eq!(parsed.process_id, "ac-audio-mixer-3");
    }

    #[test]
    fn test_rejects_other_files() {
        assert!(!is_log_file_name("log.txt"));
        assert!(!is_log_file_name("domain-server-1-stdout.log"));
        assert!(!is_log_file_name("interface-1-stdout.txt"));
        assert!(parse_log_file_name("domain-server-stdout.txt").is_none());
    }

    #[test]
    fn test_scan_groups_streams_by_process() {
        let dir = tempdir().unwrap();
        for name in [
            "domain-server-1-stdout.txt",
            "domain-server-1-stderr.txt",
            "ac-2-stdout.txt",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let ds = scan_log_directory(dir.path(), LogGroup::DomainServer).unwrap();
        assert_eq!(ds.len(), 1);
        let logs = ds.get("domain-server-1").unwrap();
        assert!(logs.stdout.as_deref().unwrap().ends_with("domain-server-1-stdout.txt"));
        assert!(logs.stderr.as_deref().unwrap().ends_with("domain-server-1-stderr.txt"));

        let ac = scan_log_directory(dir.path(), LogGroup::AssignmentClient).unwrap();
        assert_eq!(ac.len(), 1);
        assert!(ac.get("ac-2").unwrap().stderr.is_none());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let snapshot =
            scan_log_directory(&dir.path().join("absent"), LogGroup::DomainServer).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_rescan_notifies_only_on_change() {
        let dir = tempdir().unwrap();
        let registry = LogDirectoryRegistry::open(dir.path(), LogGroup::DomainServer);
        let mut rx = registry.subscribe();

        assert!(!registry.rescan());
        assert!(rx.try_recv().is_err());

        fs::write(dir.path().join("domain-server-5-stdout.txt"), b"").unwrap();
        assert!(registry.rescan());
        assert!(rx.try_recv().is_ok());
        assert_eq!(registry.get_logs().unwrap().len(), 1);

        assert!(!registry.rescan());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_watcher_picks_up_new_files() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(LogDirectoryRegistry::open(dir.path(), LogGroup::AssignmentClient));
        let mut rx = registry.subscribe();
        let cancel = CancellationToken::new();
        let watcher = registry.spawn_watcher(Duration::from_millis(10), cancel.clone());

        fs::write(dir.path().join("ac-1-stdout.txt"), b"").unwrap();
        let update = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.group, LogGroup::AssignmentClient);

        cancel.cancel();
        watcher.await.unwrap();
    }

    #[tokio::test]
    async fn test_watcher_with_zero_period_keeps_running() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(LogDirectoryRegistry::open(dir.path(), LogGroup::DomainServer));
        let mut rx = registry.subscribe();
        let cancel = CancellationToken::new();
        let watcher = registry.spawn_watcher(Duration::ZERO, cancel.clone());

        fs::write(dir.path().join("domain-server-3-stdout.txt"), b"").unwrap();
        let update = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.group, LogGroup::DomainServer);
        assert!(!watcher.is_finished());

        cancel.cancel();
        watcher.await.unwrap();
    }
}
