//! Campaign statistics.
//!
//! Counters are updated once per iteration by the campaign controller.
//! Every classified iteration lands in exactly one outcome bucket, so
//! `total == crashes + timeouts + tool_errors + successes` always holds.
//! Iterations lost to harness I/O failures have no outcome and are counted
//! separately.

use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Aggregate counters for one fuzzing campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    /// Classified iterations.
    pub total: u64,
    /// Iterations classified as [`Outcome::Crash`].
    pub crashes: u64,
    /// Iterations classified as [`Outcome::Timeout`].
    pub timeouts: u64,
    /// Iterations classified as [`Outcome::ToolError`].
    pub tool_errors: u64,
    /// Iterations classified as [`Outcome::Success`].
    pub successes: u64,
    /// Iterations that failed inside the harness and produced no outcome.
    pub harness_errors: u64,
    /// Sum of target wall-clock time in nanoseconds.
    exec_ns_sum: u64,
    /// Slowest single invocation in nanoseconds.
    exec_ns_max: u64,
}

impl CampaignStats {
    /// Create zeroed statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one classified iteration.
    pub fn record(&mut self, outcome: Outcome, elapsed: Duration) {
        self.total += 1;
        match outcome {
            Outcome::Crash => self.crashes += 1,
            Outcome::Timeout => self.timeouts += 1,
            Outcome::ToolError => self.tool_errors += 1,
            Outcome::Success => self.successes += 1,
        }

        let ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.exec_ns_sum = self.exec_ns_sum.saturating_add(ns);
        self.exec_ns_max = self.exec_ns_max.max(ns);
    }

    /// Record an iteration lost to a harness failure.
    pub fn record_harness_error(&mut self) {
        self.harness_errors += 1;
    }

    /// Number of iterations attempted, classified or not.
    #[must_use]
    pub fn attempted(&self) -> u64 {
        self.total + self.harness_errors
    }

    /// Count for a single outcome bucket.
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Crash => self.crashes,
            Outcome::Timeout => self.timeouts,
            Outcome::ToolError => self.tool_errors,
            Outcome::Success => self.successes,
        }
    }

    /// Check the bucket invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total == self.crashes + self.timeouts + self.tool_errors + self.successes
    }

    /// Mean target wall-clock time per classified iteration.
    #[must_use]
    pub fn mean_exec_time(&self) -> Option<Duration> {
        if self.total > 0 {
            Some(Duration::from_nanos(self.exec_ns_sum / self.total))
        } else {
            None
        }
    }

    /// Slowest single invocation.
    #[must_use]
    pub fn max_exec_time(&self) -> Option<Duration> {
        if self.total > 0 {
            Some(Duration::from_nanos(self.exec_ns_max))
        } else {
            None
        }
    }

    /// Attempts per second over the given wall-clock span.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn throughput(&self, wall: Duration) -> f64 {
        let secs = wall.as_secs_f64();
        if secs > 0.0 {
            self.attempted() as f64 / secs
        } else {
            0.0
        }
    }
}
