//! Classified result of a single target invocation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of running the target on one generated input.
///
/// `ToolError` is the benign case: the target rejected bad input the way a
/// compiler should. Only `Crash` and `Timeout` are persisted to the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Target exited with status zero and no fault marker.
    Success,
    /// Target exited non-zero without signal or fault marker.
    ToolError,
    /// Target was killed by a signal or reported a fault marker.
    Crash,
    /// Target did not terminate before the deadline.
    Timeout,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::ToolError => write!(f, "ToolError"),
            Self::Crash => write!(f, "Crash"),
            Self::Timeout => write!(f, "Timeout"),
        }
    }
}

impl Outcome {
    /// Returns true if this outcome produces a crash record.
    #[must_use]
    pub fn is_recorded(self) -> bool {
        matches!(self, Self::Crash | Self::Timeout)
    }

    /// Lowercase tag used in corpus filenames.
    #[must_use]
    pub fn file_tag(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ToolError => "tool_error",
            Self::Crash => "crash",
            Self::Timeout => "timeout",
        }
    }
}
