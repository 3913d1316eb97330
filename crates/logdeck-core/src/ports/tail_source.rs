//! Tail source port: the filesystem collaborator that follows growing files.

use crate::domain::{TailEvent, TailRequest};

/// Destination for events produced by running tails.
///
/// Implementations must not block; tails call `emit` from their poll loop.
pub trait TailEventSink: Send + Sync {
    fn emit(&self, event: TailEvent);
}

/// Control handle of one running tail.
pub trait TailHandle: Send {
    /// Stop polling and release the file. Idempotent, and safe when the file
    /// has already been deleted. No event is emitted for this tail afterwards.
    fn stop(&mut self);

    fn is_stopped(&self) -> bool;
}

/// Port for starting tails.
pub trait TailSourcePort: Send + Sync {
    /// Start following `request.path`; events go to the sink the source was
    /// built with.
    fn start_tail(&self, request: TailRequest) -> Box<dyn TailHandle>;
}
