//! Runtime adapters for logdeck.
//!
//! - `tail` - polling file tailer implementing `TailSourcePort`
//! - `registry` - in-memory and log-directory process registries
//! - `retention` - start-up sweep of old log files
//! - `session` - the event loop that owns the tracker and the display controller

#![deny(unsafe_code)]

pub mod registry;
pub mod retention;
pub mod session;
pub mod tail;

pub use registry::{
    InMemoryProcessRegistry, LogDirectoryRegistry, LogFileName, LogStream, is_log_file_name,
    parse_log_file_name, scan_log_directory,
};
pub use retention::{SweepReport, sweep_old_logs, sweep_old_logs_at};
pub use session::{LogViewerSession, SessionError, SessionEvent, SessionHandle, UiAction};
pub use tail::{
    ChannelTailSink, LineSplitter, MAX_READ_PER_POLL, MIN_POLL_INTERVAL, PollingTailHandle,
    PollingTailer,
};

