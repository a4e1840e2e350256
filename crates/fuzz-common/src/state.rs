//! Campaign lifecycle state machine.
//!
//! IDLE → RUNNING → REPORTING → DONE
//!
//! An interrupted campaign takes the same RUNNING → REPORTING edge as a
//! completed one, so a report is always produced once the loop has started.

use crate::error::{FuzzError, FuzzResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of a fuzzing campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignState {
    /// Configured but not started.
    #[default]
    Idle,
    /// Iterating.
    Running,
    /// Loop finished or interrupted; summarizing.
    Reporting,
    /// Report produced.
    Done,
}

impl fmt::Display for CampaignState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Running => write!(f, "RUNNING"),
            Self::Reporting => write!(f, "REPORTING"),
            Self::Done => write!(f, "DONE"),
        }
    }
}

impl CampaignState {
    /// Check if a transition to `target` is valid from the current state.
    #[must_use]
    pub fn can_transition_to(&self, target: CampaignState) -> bool {
        use CampaignState::{Done, Idle, Reporting, Running};

        matches!(
            (self, target),
            (Idle, Running) | (Running, Reporting) | (Reporting, Done)
        )
    }

    /// Attempt to transition to `target`, returning error if invalid.
    pub fn transition_to(&mut self, target: CampaignState) -> FuzzResult<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(FuzzError::InvalidStateTransition {
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Returns true once the campaign can no longer change.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}
