//! Mapping of captured executions to outcomes.

use crate::runner::ExecutionResult;
use fuzz_common::config::DEFAULT_FAULT_MARKERS;
use fuzz_common::outcome::Outcome;

/// Ordered-rule outcome classifier.
///
/// Rules, first match wins:
/// 1. deadline expired: [`Outcome::Timeout`]
/// 2. killed by a signal, or stderr carries a fault marker: [`Outcome::Crash`]
/// 3. non-zero exit: [`Outcome::ToolError`]
/// 4. otherwise: [`Outcome::Success`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    fault_markers: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_FAULT_MARKERS.iter().map(ToString::to_string))
    }
}

impl Classifier {
    /// Create a classifier recognizing the given stderr fault markers.
    pub fn new(markers: impl IntoIterator<Item = String>) -> Self {
        Self {
            fault_markers: markers.into_iter().filter(|m| !m.is_empty()).collect(),
        }
    }

    /// Recognized fault markers.
    pub fn fault_markers(&self) -> &[String] {
        &self.fault_markers
    }

    /// First fault marker found in `stderr`.
    pub fn fault_marker<'a>(&'a self, stderr: &str) -> Option<&'a str> {
        self.fault_markers
            .iter()
            .find(|marker| stderr.contains(marker.as_str()))
            .map(String::as_str)
    }

    /// Classify one execution.
    pub fn classify(&self, result: &ExecutionResult) -> Outcome {
        if result.timed_out {
            Outcome::Timeout
        } else if result.signal().is_some() || self.fault_marker(&result.stderr).is_some() {
            Outcome::Crash
        } else if result.exit_status != 0 {
            Outcome::ToolError
        } else {
            Outcome::Success
        }
    }
}
