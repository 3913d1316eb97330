//! Terminal presentation.
//!
//! - `terminal_view` - `LogViewPort` that writes the active tab to a stream
//! - `tables` - formatting helpers for listing commands

pub mod tables;
pub mod terminal_view;

pub use tables::{print_separator, truncate_middle};
pub use terminal_view::TerminalView;
