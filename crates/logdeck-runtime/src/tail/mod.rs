//! File tailing.
//!
//! A tail is one tokio task per file that polls the file size, reads the
//! bytes appended since the last poll and emits complete lines through a
//! `TailEventSink`.

use std::time::Duration;

mod poller;
mod sink;
mod splitter;

pub use poller::{PollingTailHandle, PollingTailer};
pub use sink::ChannelTailSink;
pub use splitter::{LineSplitter, Split};

/// Upper bound on the bytes read from one file in a single poll.
///
/// A file that grew by more is drained over several polls.
pub const MAX_READ_PER_POLL: usize = 1024 * 1024;

/// Shortest period a tail or directory watcher ticks at.
///
/// `tokio::time::interval` rejects a zero period; shorter requests are raised
/// to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);
