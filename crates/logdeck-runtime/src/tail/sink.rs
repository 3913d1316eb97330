//! Channel-backed tail event sink.

use std::fmt;

use logdeck_core::{TailEvent, TailEventSink};
use tokio::sync::mpsc;

/// Forwards tail events into an unbounded mpsc channel.
///
/// Events are converted with `From<TailEvent>`, so the receiver can be a
/// wider event loop channel. A closed receiver drops events silently.
pub struct ChannelTailSink<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> ChannelTailSink<T> {
    pub const fn new(tx: mpsc::UnboundedSender<T>) -> Self {
        Self { tx }
    }
}

impl<T> fmt::Debug for ChannelTailSink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelTailSink")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<T> TailEventSink for ChannelTailSink<T>
where
    T: From<TailEvent> + Send + 'static,
{
    fn emit(&self, event: TailEvent) {
        let _ = self.tx.send(T::from(event));
    }
}
