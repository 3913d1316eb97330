//! `logdeck` command-line adapter.
//!
//! Wires the log-directory registries, the polling tailer and the viewer
//! session to a terminal, and exposes maintenance commands.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
