//! The two fixed log groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A category of server processes whose logs share one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogGroup {
    /// Domain-server processes (`ds`).
    #[serde(rename = "ds")]
    DomainServer,
    /// Assignment-client processes (`ac`).
    #[serde(rename = "ac")]
    AssignmentClient,
}

impl LogGroup {
    /// Both groups, in tab order.
    pub const ALL: [Self; 2] = [Self::DomainServer, Self::AssignmentClient];

    /// Short identifier (`ds` / `ac`).
    pub const fn id(self) -> &'static str {
        match self {
            Self::DomainServer => "ds",
            Self::AssignmentClient => "ac",
        }
    }

    /// Human-readable tab label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::DomainServer => "domain-server",
            Self::AssignmentClient => "assignment-client",
        }
    }

    /// Stable index for per-group arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::DomainServer => 0,
            Self::AssignmentClient => 1,
        }
    }
}

impl fmt::Display for LogGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string does not name a log group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log group '{0}' (expected ds, ac, domain-server or assignment-client)")]
pub struct ParseGroupError(pub String);

impl FromStr for LogGroup {
    type Err = ParseGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ds" | "domain-server" => Ok(Self::DomainServer),
            "ac" | "assignment-client" => Ok(Self::AssignmentClient),
            other => Err(ParseGroupError(other.to_string())),
        }
    }
}
