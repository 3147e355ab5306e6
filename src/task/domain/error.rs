//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A required draft field was not supplied.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The denormalised assignee name is empty after trimming.
    #[error("assignee name must not be empty")]
    EmptyAssigneeName,

    /// The deadline could not be parsed as a date.
    #[error("invalid deadline '{0}', expected YYYY-MM-DD or RFC 3339")]
    InvalidDeadline(String),

    /// The document reference is empty after trimming.
    #[error("document identifier must not be empty")]
    EmptyDocumentId,

    /// Comment text is empty after trimming.
    #[error("comment text cannot be empty")]
    EmptyCommentText,

    /// The priority value is unsupported.
    #[error(transparent)]
    InvalidPriority(#[from] ParsePriorityError),

    /// The status value is unsupported.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// Tasks always start pending.
    #[error("tasks must be created as pending, got {0}")]
    InvalidInitialStatus(TaskStatus),

    /// A rejection was attempted without feedback.
    #[error("rejecting task {0} requires feedback")]
    MissingRejectionFeedback(TaskId),

    /// The requested status change is not an edge of the lifecycle graph.
    #[error("invalid state transition for task {task_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// The task being transitioned.
        task_id: TaskId,
        /// The current status.
        from: TaskStatus,
        /// The requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);
