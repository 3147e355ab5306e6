//! Task status and the lifecycle transition graph.
//!
//! ```text
//! pending --start--> working --submit--> submitted_for_review
//! submitted_for_review --approve--> completed
//! submitted_for_review --reject--> working
//! ```

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Assigned but not started.
    #[default]
    Pending,
    /// The assignee is working on the task.
    Working,
    /// Awaiting a manager's decision.
    SubmittedForReview,
    /// Approved by a manager.
    Completed,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Working,
        Self::SubmittedForReview,
        Self::Completed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Working => "working",
            Self::SubmittedForReview => "submitted_for_review",
            Self::Completed => "completed",
        }
    }

    /// Returns the edge from `self` to `target`, if the graph defines one.
    #[must_use]
    pub const fn transition_to(self, target: Self) -> Option<TransitionKind> {
        match (self, target) {
            (Self::Pending, Self::Working) => Some(TransitionKind::StartWork),
            (Self::Working, Self::SubmittedForReview) => Some(TransitionKind::Submit),
            (Self::SubmittedForReview, Self::Completed) => Some(TransitionKind::Approve),
            (Self::SubmittedForReview, Self::Working) => Some(TransitionKind::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

/// A named edge of the lifecycle graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// `pending -> working`.
    StartWork,
    /// `working -> submitted_for_review`.
    Submit,
    /// `submitted_for_review -> completed`.
    Approve,
    /// `submitted_for_review -> working`, with feedback.
    Reject,
}

impl TransitionKind {
    /// Returns who may traverse this edge.
    #[must_use]
    pub const fn authority(self) -> TransitionAuthority {
        match self {
            Self::StartWork | Self::Submit => TransitionAuthority::Assignee,
            Self::Approve | Self::Reject => TransitionAuthority::Manager,
        }
    }

    /// Returns `true` when the edge must carry reviewer feedback.
    #[must_use]
    pub const fn requires_feedback(self) -> bool {
        matches!(self, Self::Reject)
    }

    /// Returns a short verb phrase for error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::StartWork => "start work on the task",
            Self::Submit => "submit the task for review",
            Self::Approve => "approve the task",
            Self::Reject => "reject the task",
        }
    }
}

/// Principal allowed to traverse an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionAuthority {
    /// Only the task's assignee.
    Assignee,
    /// Any principal holding the manager role.
    Manager,
}
