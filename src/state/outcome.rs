/// Per-cursor outcomes and run stop reasons
///
/// This module defines what can happen to a single cursor and why a source
/// run ends.
use std::fmt;

/// Result of fetching and extracting one cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorOutcome {
    /// A record with a title or body text was produced
    Accepted,

    /// The page loaded but held no recognizable article
    Rejected,

    /// HTTP 404, a site "not found" marker, or a fetch that failed after retries
    NotFound,
}

impl CursorOutcome {
    /// Returns true if this outcome counts toward the empty streak
    pub fn is_empty(&self) -> bool {
        !matches!(self, Self::Accepted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for CursorOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a source run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The empty streak reached its limit
    Exhausted,

    /// The same listing page was served repeatedly
    DuplicateLoop,

    /// The configured cursor or page cap was reached
    IterationCap,

    /// Shutdown was requested
    Shutdown,
}

impl StopReason {
    /// Converts the stop reason to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::DuplicateLoop => "duplicate_loop",
            Self::IterationCap => "iteration_cap",
            Self::Shutdown => "shutdown",
        }
    }

    /// Parses a stop reason from a database string representation
    ///
    /// Returns None if the string doesn't match any known reason.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "exhausted" => Some(Self::Exhausted),
            "duplicate_loop" => Some(Self::DuplicateLoop),
            "iteration_cap" => Some(Self::IterationCap),
            "shutdown" => Some(Self::Shutdown),
            _ => None,
        }
    }

    /// Returns all stop reasons
    pub fn all() -> [Self; 4] {
        [
            Self::Exhausted,
            Self::DuplicateLoop,
            Self::IterationCap,
            Self::Shutdown,
        ]
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
