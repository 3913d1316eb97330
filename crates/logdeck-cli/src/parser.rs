//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Follow the logs of a locally launched domain-server / assignment-client stack.
#[derive(Parser)]
#[command(name = "logdeck")]
#[command(about = "Tail and filter domain-server and assignment-client logs")]
#[command(version)]
pub struct Cli {
    /// Override the server log directory for this invocation
    #[arg(long = "log-dir", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
