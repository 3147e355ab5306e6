//! Repository port for task persistence, lookup, and atomic mutation.

use crate::principal::domain::PrincipalId;
use crate::task::domain::{Comment, Task, TaskDomainError, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Restrict to tasks assigned to this principal.
    pub assignee_id: Option<PrincipalId>,
    /// Restrict to tasks in this status.
    pub status: Option<TaskStatus>,
}

impl TaskQuery {
    /// Matches every task.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the query to one assignee.
    #[must_use]
    pub fn assigned_to(mut self, assignee_id: PrincipalId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Restricts the query to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns `true` when `task` satisfies every filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let assignee_matches = self
            .assignee_id
            .as_ref()
            .is_none_or(|assignee| task.assignee_id() == assignee);
        let status_matches = self.status.is_none_or(|status| task.status() == status);
        assignee_matches && status_matches
    }
}

/// Compare-and-set request for a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Task to update.
    pub task_id: TaskId,
    /// Status the caller observed and validated against.
    pub expected: TaskStatus,
    /// Status to store.
    pub next: TaskStatus,
    /// Comment appended in the same atomic step, if any.
    pub comment: Option<Comment>,
    /// Modification timestamp to store.
    pub updated_at: DateTime<Utc>,
}

/// Task persistence contract.
///
/// Mutations after creation go through atomic primitives so that concurrent
/// callers never overwrite one another's changes.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks matching `query`, newest-created first.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Atomically appends a comment and returns the updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn append_comment(
        &self,
        id: TaskId,
        comment: &Comment,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Atomically sets the status if it still equals `update.expected`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::StatusConflict`] when the stored status
    /// differs from the expected one, or [`TaskRepositoryError::Rejected`]
    /// when the task itself refuses the edge. Nothing is written in any of
    /// these cases.
    async fn update_status(&self, update: &StatusUpdate) -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored status changed since the caller read it.
    #[error("status conflict on task {task_id}: expected {expected}, found {actual}")]
    StatusConflict {
        /// The task being updated.
        task_id: TaskId,
        /// The status the caller expected.
        expected: TaskStatus,
        /// The status actually stored.
        actual: TaskStatus,
    },

    /// The stored task rejected the mutation.
    #[error(transparent)]
    Rejected(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
