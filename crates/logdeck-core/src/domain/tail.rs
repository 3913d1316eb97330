//! Tail requests, tail events and the per-group initial offset policy.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::group::LogGroup;
use super::line::LogLine;
use crate::ports::TailError;

/// Where a new tail starts reading an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum InitialOffsetPolicy {
    /// Replay the whole file from byte 0.
    FromStart,
    /// Only the last `window_bytes` of the file.
    TailWindow { window_bytes: u64 },
}

impl InitialOffsetPolicy {
    /// Resolve the start offset for a file of `file_size` bytes.
    pub const fn resolve(self, file_size: u64) -> u64 {
        match self {
            Self::FromStart => 0,
            Self::TailWindow { window_bytes } => file_size.saturating_sub(window_bytes),
        }
    }
}

/// Tailing configuration for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupTailConfig {
    pub initial_offset: InitialOffsetPolicy,
    pub poll_interval: Duration,
}

/// Tailing configuration for both groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailPolicies {
    groups: [GroupTailConfig; 2],
}

impl TailPolicies {
    /// Domain-server logs replay from the start; assignment-client logs only
    /// show a recent window.
    pub const fn new(poll_interval: Duration, tail_window_bytes: u64) -> Self {
        Self {
            groups: [
                GroupTailConfig {
                    initial_offset: InitialOffsetPolicy::FromStart,
                    poll_interval,
                },
                GroupTailConfig {
                    initial_offset: InitialOffsetPolicy::TailWindow {
                        window_bytes: tail_window_bytes,
                    },
                    poll_interval,
                },
            ],
        }
    }

    pub const fn for_group(&self, group: LogGroup) -> GroupTailConfig {
        self.groups[group.index()]
    }

    /// Override the configuration of a single group.
    #[must_use]
    pub fn with_group(mut self, group: LogGroup, config: GroupTailConfig) -> Self {
        self.groups[group.index()] = config;
        self
    }
}

/// Identifies one tail instance.
///
/// Ids are never reused within a tracker, so a file that disappears and
/// reappears under the same path gets a fresh id and events from the old
/// instance can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TailId(pub u64);

impl fmt::Display for TailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tail#{}", self.0)
    }
}

/// Everything a tail source needs to start following a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailRequest {
    pub id: TailId,
    pub group: LogGroup,
    /// Normalized path of the file.
    pub path: String,
    pub initial_offset: InitialOffsetPolicy,
    pub poll_interval: Duration,
}

/// Events emitted by a running tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailEvent {
    /// A complete line was read.
    Line { tail: TailId, line: LogLine },
    /// The file could not be read; the tail keeps polling.
    Error { tail: TailId, error: TailError },
    /// A previously failing tail read successfully again.
    Recovered { tail: TailId },
}

impl TailEvent {
    pub const fn tail(&self) -> TailId {
        match self {
            Self::Line { tail, .. } | Self::Error { tail, .. } | Self::Recovered { tail } => *tail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_start_always_zero() {
        assert_eq!(InitialOffsetPolicy::FromStart.resolve(0), 0);
        assert_eq!(InitialOffsetPolicy::FromStart.resolve(1_000_000), 0);
    }

    #[test]
    fn test_tail_window_offsets() {
        let policy = InitialOffsetPolicy::TailWindow {
            window_bytes: 25_000,
        };
        assert_eq!(policy.resolve(30_000), 5_000);
        assert_eq!(policy.resolve(25_000), 0);
        assert_eq!(policy.resolve(100), 0);
    }

    #[test]
    fn test_default_group_asymmetry() {
        let policies = TailPolicies::new(Duration::from_millis(500), 25_000);
        assert_eq!(
            policies.for_group(LogGroup::DomainServer).initial_offset,
            InitialOffsetPolicy::FromStart
        );
        assert_eq!(
            policies.for_group(LogGroup::AssignmentClient).initial_offset,
            InitialOffsetPolicy::TailWindow {
                window_bytes: 25_000
            }
        );
    }

    #[test]
    fn test_with_group_override() {
        let policies = TailPolicies::new(Duration::from_millis(500), 25_000).with_group(
            LogGroup::AssignmentClient,
            GroupTailConfig {
                initial_offset: InitialOffsetPolicy::FromStart,
                poll_interval: Duration::from_millis(50),
            },
        );
        let ac = policies.for_group(LogGroup::AssignmentClient);
        assert_eq!(ac.initial_offset, InitialOffsetPolicy::FromStart);
        assert_eq!(ac.poll_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_policy_json_shape() {
        let json = serde_json::to_value(InitialOffsetPolicy::TailWindow {
            window_bytes: 25_000,
        })
        .unwrap();
        assert_eq!(json["policy"], "tail_window");
        assert_eq!(json["window_bytes"], 25_000);
    }
}
