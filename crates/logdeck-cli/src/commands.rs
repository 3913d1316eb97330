//! Main commands enum and subcommand arguments.

use clap::{Args, Subcommand};
use logdeck_core::LogGroup;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Follow the server logs in the terminal
    Watch(WatchArgs),

    /// Delete server log files older than the retention period
    Sweep {
        /// Delete files last modified at least this many days ago
        #[arg(long = "max-age-days")]
        max_age_days: Option<u64>,
        /// Only list the files that would be deleted
        #[arg(long)]
        dry_run: bool,
    },

    /// List the processes found in the log directory
    Processes {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show resolved paths for all logdeck directories
    Paths,
}

/// Arguments of `logdeck watch`.
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Tab shown first (`ds` or `ac`)
    #[arg(long)]
    pub tab: Option<LogGroup>,

    /// Initial case-insensitive filter
    #[arg(long)]
    pub filter: Option<String>,

    /// Log directory rescan interval in milliseconds
    #[arg(long = "rescan-ms")]
    pub rescan_ms: Option<u64>,

    /// Keep log files older than the retention period instead of deleting them at start
    #[arg(long = "no-sweep")]
    pub no_sweep: bool,
}
