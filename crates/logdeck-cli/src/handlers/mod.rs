//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub fn execute(ctx: &CliContext, ...) -> Result<()>`
//!   (`async` when the command runs the session)
//! - Thin wrappers that:
//!   1. Validate CLI-specific input
//!   2. Call core/runtime operations
//!   3. Format output for the terminal

pub mod paths;
pub mod processes;
pub mod sweep;
pub mod watch;
