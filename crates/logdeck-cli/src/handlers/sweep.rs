//! Sweep command handler.
//!
//! Deletes server log files older than the retention period on demand.
//! `watch` runs the same sweep with the configured retention when it starts.

use std::time::{Duration, SystemTime};

use anyhow::Result;
use logdeck_runtime::sweep_old_logs_at;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the sweep command.
///
/// `max_age_days` falls back to the configured retention period.
pub fn execute(ctx: &CliContext, max_age_days: Option<u64>, dry_run: bool) -> Result<()> {
    let max_age = match max_age_days {
        Some(0) => {
            return Err(CliError::Arguments("--max-age-days must be at least 1".into()).into());
        }
        Some(days) => Duration::from_secs(days.saturating_mul(24 * 60 * 60)),
        None => ctx.settings.retention_max_age(),
    };

    let dir = ctx.log_dir();
    if !dir.exists() {
        println!("Log directory {} does not exist; nothing to sweep.", dir.display());
        return Ok(());
    }

    let report = sweep_old_logs_at(dir, max_age, SystemTime::now(), dry_run);

    for path in &report.expired {
        let verb = if dry_run { "would delete" } else { "deleted" };
        println!("{verb}: {}", path.display());
    }
    println!(
        "{} log file(s) checked, {} {}, {} failed.",
        report.scanned,
        report.deleted,
        if dry_run { "expired" } else { "deleted" },
        report.failed
    );
    Ok(())
}
