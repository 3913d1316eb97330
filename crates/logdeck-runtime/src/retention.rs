//! Start-up cleanup of old server log files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};

use crate::registry::is_log_file_name;

/// Outcome of a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Regular files whose name matched the log file pattern.
    pub scanned: usize,
    /// Files removed (or, in a dry run, that would have been removed).
    pub deleted: usize,
    /// Files that could not be stat'ed or removed.
    pub failed: usize,
    /// Paths of the expired files, in directory order.
    pub expired: Vec<PathBuf>,
}

/// Delete server log files in `dir` last modified at least `max_age` ago.
///
/// A missing or unreadable directory is logged and yields an empty report.
pub fn sweep_old_logs(dir: &Path, max_age: Duration) -> SweepReport {
    sweep_old_logs_at(dir, max_age, SystemTime::now(), false)
}

/// Same as `sweep_old_logs` with an explicit clock; `dry_run` only reports.
pub fn sweep_old_logs_at(
    dir: &Path,
    max_age: Duration,
    now: SystemTime,
    dry_run: bool,
) -> SweepReport {
    let mut report = SweepReport::default();

    debug!(dir = %dir.display(), "Deleting old log files");
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Error reading contents of log directory");
            return report;
        }
    };

    for entry in entries.flatten() {
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !is_log_file_name(&name) {
            continue;
        }

        let path = entry.path();
        let modified = match entry.metadata() {
            Ok(meta) if meta.is_file() => meta.modified(),
            Ok(_) => continue,
            Err(e) => Err(e),
        };
        report.scanned += 1;

        let modified = match modified {
            Ok(modified) => modified,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Error stat'ing log file");
                report.failed += 1;
                continue;
            }
        };

        // Files from the future have age zero.
        let age = now.duration_since(modified).unwrap_or_default();
        if age < max_age {
            continue;
        }

        if dry_run {
            debug!(path = %path.display(), age_secs = age.as_secs(), "Would delete");
        } else if let Err(e) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "Failed to delete old log file");
            report.failed += 1;
            continue;
        } else {
            debug!(path = %path.display(), age_secs = age.as_secs(), "Deleted");
        }
        report.deleted += 1;
        report.expired.push(path);
    }

    if report.deleted > 0 || report.failed > 0 {
        info!(
            "Log sweep complete: {} of {} files {}, {} failures",
            report.deleted,
            report.scanned,
            if dry_run { "expired" } else { "deleted" },
            report.failed
        );
    }

    report
}
