//! Viewer services - the business logic layer.
//!
//! Services orchestrate between ports and domain types. They don't know about
//! concrete implementations and perform no I/O of their own.

mod display;
mod tracker;

pub use display::{LogDisplayController, LogViewerState};
pub use tracker::{LogSourceTracker, ReconcileOutcome, TailStatus};
