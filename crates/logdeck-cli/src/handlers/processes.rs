//! Processes command handler.
//!
//! Lists the processes whose log files are present in the log directory.

use std::collections::BTreeMap;

use anyhow::Result;
use logdeck_core::{LogGroup, RegistrySnapshot};
use logdeck_runtime::scan_log_directory;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_separator, truncate_middle};

/// Execute the processes command.
pub fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let mut snapshots = BTreeMap::new();
    for group in LogGroup::ALL {
        snapshots.insert(
            group,
            scan_log_directory(ctx.log_dir(), group).map_err(CliError::from)?,
        );
    }

    if json {
        let json = serde_json::to_string_pretty(&snapshots)
            .map_err(|e| CliError::Core(format!("failed to serialize processes: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    println!("Log directory: {}\n", ctx.log_dir().display());
    for (group, snapshot) in &snapshots {
        print_group(*group, snapshot);
    }
    Ok(())
}

fn print_group(group: LogGroup, snapshot: &RegistrySnapshot) {
    println!("{} ({} process(es))", group.label(), snapshot.len());
    if snapshot.is_empty() {
        println!("  none\n");
        return;
    }

    println!("  {:<28} {:<6} Path", "Process", "Stream");
    print!("  ");
    print_separator(90);
    for (process_id, logs) in snapshot.iter() {
        for (stream, path) in [("stdout", &logs.stdout), ("stderr", &logs.stderr)] {
            if let Some(path) = path {
                println!(
                    "  {:<28} {:<6} {}",
                    truncate_middle(process_id, 28),
                    stream,
                    truncate_middle(path, 80)
                );
            }
        }
    }
    println!();
}
