//! Domain types for the log viewer.
//!
//! These are pure data types with no infrastructure dependencies.

mod buffer;
mod filter;
mod group;
mod line;
mod registry;
mod tail;

pub use buffer::{BufferedLine, MAX_RETAINED_LINES, TabBuffer};
pub use filter::FilterState;
pub use group::{LogGroup, ParseGroupError};
pub use line::{LogLine, normalize_path};
pub use registry::{ProcessLogs, RegistrySnapshot};
pub use tail::{GroupTailConfig, InitialOffsetPolicy, TailEvent, TailId, TailPolicies, TailRequest};
