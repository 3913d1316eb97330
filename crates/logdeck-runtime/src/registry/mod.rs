//! Process registry adapters.
//!
//! - `InMemoryProcessRegistry` - snapshot set programmatically
//! - `LogDirectoryRegistry` - snapshot derived from the log directory contents

mod directory;
mod memory;

pub use directory::{
    LogDirectoryRegistry, LogFileName, LogStream, is_log_file_name, parse_log_file_name,
    scan_log_directory,
};
pub use memory::InMemoryProcessRegistry;

/// Broadcast channel capacity for `updated` notifications.
///
/// Notifications carry no payload, so a lagging subscriber only needs one.
const UPDATE_CHANNEL_CAPACITY: usize = 16;
