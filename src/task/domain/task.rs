//! Task aggregate root.

use super::{
    Comment, Deadline, DocumentId, Priority, TaskDomainError, TaskId, TaskStatus, TaskTitle,
    TransitionKind,
};
use crate::principal::domain::PrincipalId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated fields for a new task. Produced by
/// [`TaskDraft::validate`](super::TaskDraft::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: TaskTitle,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Assigned principal.
    pub assignee_id: PrincipalId,
    /// Assignee display name at assignment time.
    pub assignee_name: String,
    /// Urgency.
    pub priority: Priority,
    /// Due date.
    pub deadline: Deadline,
    /// Creating principal.
    pub created_by: PrincipalId,
    /// Optional linked document.
    pub document_id: Option<DocumentId>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    assignee_id: PrincipalId,
    assignee_name: String,
    priority: Priority,
    status: TaskStatus,
    deadline: Deadline,
    created_by: PrincipalId,
    document_id: Option<DocumentId>,
    comments: Vec<Comment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted assignee reference.
    pub assignee_id: PrincipalId,
    /// Persisted assignee name snapshot.
    pub assignee_name: String,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted deadline.
    pub deadline: Deadline,
    /// Persisted creator reference.
    pub created_by: PrincipalId,
    /// Persisted document reference.
    pub document_id: Option<DocumentId>,
    /// Persisted comment thread in insertion order.
    pub comments: Vec<Comment>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task from validated fields.
    #[must_use]
    pub fn new(fields: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: fields.title,
            description: fields.description,
            assignee_id: fields.assignee_id,
            assignee_name: fields.assignee_name,
            priority: fields.priority,
            status: TaskStatus::Pending,
            deadline: fields.deadline,
            created_by: fields.created_by,
            document_id: fields.document_id,
            comments: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            assignee_id: data.assignee_id,
            assignee_name: data.assignee_name,
            priority: data.priority,
            status: data.status,
            deadline: data.deadline,
            created_by: data.created_by,
            document_id: data.document_id,
            comments: data.comments,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the assignee reference.
    #[must_use]
    pub const fn assignee_id(&self) -> &PrincipalId {
        &self.assignee_id
    }

    /// Returns the assignee's display name as captured at assignment.
    #[must_use]
    pub fn assignee_name(&self) -> &str {
        &self.assignee_name
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Returns the creator reference.
    #[must_use]
    pub const fn created_by(&self) -> &PrincipalId {
        &self.created_by
    }

    /// Returns the linked document, if any.
    #[must_use]
    pub const fn document_id(&self) -> Option<&DocumentId> {
        self.document_id.as_ref()
    }

    /// Returns the comment thread in insertion order.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `principal` is the assignee.
    #[must_use]
    pub fn is_assignee(&self, principal: &PrincipalId) -> bool {
        &self.assignee_id == principal
    }

    /// Returns the party that should hear about a comment by `author`: the
    /// assignee when the creator writes, otherwise the creator.
    #[must_use]
    pub fn comment_recipient(&self, author: &PrincipalId) -> &PrincipalId {
        if author == &self.created_by {
            &self.assignee_id
        } else {
            &self.created_by
        }
    }

    /// Appends a comment and refreshes the modification timestamp.
    pub fn append_comment(&mut self, comment: Comment, at: DateTime<Utc>) {
        self.comments.push(comment);
        self.updated_at = at;
    }

    /// Resolves the lifecycle edge towards `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the graph has
    /// no such edge from the current status.
    pub fn transition_kind(&self, target: TaskStatus) -> Result<TransitionKind, TaskDomainError> {
        self.status
            .transition_to(target)
            .ok_or(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            })
    }

    /// Moves the task to `target`, appending `comment` in the same step.
    ///
    /// The task is left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the graph has
    /// no such edge, or [`TaskDomainError::MissingRejectionFeedback`] when a
    /// rejection carries no comment.
    pub fn apply_transition(
        &mut self,
        target: TaskStatus,
        comment: Option<Comment>,
        at: DateTime<Utc>,
    ) -> Result<TransitionKind, TaskDomainError> {
        let kind = self.transition_kind(target)?;
        if kind.requires_feedback() && comment.is_none() {
            return Err(TaskDomainError::MissingRejectionFeedback(self.id));
        }
        self.status = target;
        if let Some(entry) = comment {
            self.comments.push(entry);
        }
        self.updated_at = at;
        Ok(kind)
    }
}
