//! Notification categories.

use super::ParseNotificationKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A task was assigned to the recipient.
    TaskAssigned,
    /// A document was submitted for the recipient's attention.
    DocSubmitted,
    /// A task the recipient follows was completed.
    TaskCompleted,
    /// A deadline is approaching.
    Deadline,
    /// Someone wrote to the recipient on a task thread.
    Mention,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::DocSubmitted => "doc_submitted",
            Self::TaskCompleted => "task_completed",
            Self::Deadline => "deadline",
            Self::Mention => "mention",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = ParseNotificationKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "task_assigned" => Ok(Self::TaskAssigned),
            "doc_submitted" => Ok(Self::DocSubmitted),
            "task_completed" => Ok(Self::TaskCompleted),
            "deadline" => Ok(Self::Deadline),
            "mention" => Ok(Self::Mention),
            _ => Err(ParseNotificationKindError(value.to_owned())),
        }
    }
}
