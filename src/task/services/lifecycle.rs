//! Task lifecycle controller: creation, status transitions, and comments,
//! with the notifications each of them produces.

use super::messages;
use crate::{
    error::ErrorKind,
    notification::{
        domain::NotificationKind,
        ports::NotificationRepository,
        services::{EmitNotification, NotificationService},
    },
    principal::{
        domain::{Principal, PrincipalId, Role},
        ports::{PrincipalDirectory, PrincipalDirectoryError},
    },
    task::{
        domain::{
            Comment, CommentText, Priority, Task, TaskDomainError, TaskDraft, TaskId, TaskStatus,
            TransitionAuthority,
        },
        ports::{StatusUpdate, TaskQuery, TaskRepository, TaskRepositoryError},
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    assignee_id: PrincipalId,
    deadline: String,
    description: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    document_id: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        assignee_id: PrincipalId,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            assignee_id,
            deadline: deadline.into(),
            description: None,
            priority: None,
            status: None,
            document_id: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the task priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets an explicit initial status. Only `pending` is accepted.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Links a document to the task.
    #[must_use]
    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }
}

/// Request payload for moving a task along its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTaskRequest {
    task_id: TaskId,
    target: String,
    feedback: Option<String>,
}

impl TransitionTaskRequest {
    /// Creates a transition request towards `target`.
    #[must_use]
    pub fn new(task_id: TaskId, target: impl Into<String>) -> Self {
        Self {
            task_id,
            target: target.into(),
            feedback: None,
        }
    }

    /// Attaches reviewer feedback. Required when rejecting a submission.
    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// Request payload for commenting on a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCommentRequest {
    task_id: TaskId,
    text: String,
}

impl AddCommentRequest {
    /// Creates a comment request.
    #[must_use]
    pub fn new(task_id: TaskId, text: impl Into<String>) -> Self {
        Self {
            task_id,
            text: text.into(),
        }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The acting principal lacks authority for the action.
    #[error("principal {principal} may not {action}")]
    Forbidden {
        /// The acting principal.
        principal: PrincipalId,
        /// What was attempted.
        action: &'static str,
    },

    /// No task has the identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A referenced principal could not be resolved.
    #[error(transparent)]
    Directory(#[from] PrincipalDirectoryError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskLifecycleError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) | Self::Repository(TaskRepositoryError::Rejected(err)) => {
                domain_error_kind(err)
            }
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound(_)
            | Self::Directory(PrincipalDirectoryError::NotFound(_))
            | Self::Repository(TaskRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Directory(PrincipalDirectoryError::Domain(_)) => ErrorKind::Validation,
            Self::Repository(TaskRepositoryError::StatusConflict { .. }) => {
                ErrorKind::InvalidTransition
            }
            Self::Directory(PrincipalDirectoryError::Unavailable(_))
            | Self::Repository(
                TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::Persistence(_),
            ) => ErrorKind::Internal,
        }
    }
}

const fn domain_error_kind(err: &TaskDomainError) -> ErrorKind {
    match err {
        TaskDomainError::InvalidStateTransition { .. } => ErrorKind::InvalidTransition,
        _ => ErrorKind::Validation,
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every mutation commits before any notification is emitted, and a failed
/// emit is logged without failing the mutation.
pub struct TaskLifecycleService<R, N, D, C>
where
    R: TaskRepository,
    N: NotificationRepository,
    D: PrincipalDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifications: Arc<NotificationService<N, D, C>>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<R, N, D, C> TaskLifecycleService<R, N, D, C>
where
    R: TaskRepository,
    N: NotificationRepository,
    D: PrincipalDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        notifications: Arc<NotificationService<N, D, C>>,
        directory: Arc<D>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            notifications,
            directory,
            clock,
        }
    }

    /// Creates a pending task and notifies its assignee.
    ///
    /// Managers may assign to anyone; other roles may only assign to
    /// themselves. The assignee's current display name is stored on the task
    /// and not refreshed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] for assignment outside the
    /// actor's authority, [`TaskLifecycleError::Directory`] when the assignee
    /// is unknown, [`TaskLifecycleError::Domain`] when validation fails, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(
        &self,
        actor: &Principal,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let may_assign = match actor.role() {
            Role::Manager => true,
            Role::Employee | Role::DocAssistant => &request.assignee_id == actor.id(),
        };
        if !may_assign {
            return Err(TaskLifecycleError::Forbidden {
                principal: actor.id().clone(),
                action: "assign tasks to other principals",
            });
        }

        let assignee = self.directory.resolve(&request.assignee_id).await?;
        let mut draft = TaskDraft::new()
            .with_title(request.title)
            .with_assignee(assignee.id().clone(), assignee.name())
            .with_deadline(request.deadline)
            .with_created_by(actor.id().clone());
        if let Some(description) = request.description {
            draft = draft.with_description(description);
        }
        if let Some(priority) = request.priority {
            draft = draft.with_priority(priority);
        }
        if let Some(status) = request.status {
            draft = draft.with_status(status);
        }
        if let Some(document_id) = request.document_id {
            draft = draft.with_document_id(document_id);
        }

        let task = Task::new(draft.validate()?, &*self.clock);
        self.repository.store(&task).await?;
        tracing::debug!(task_id = %task.id(), assignee = %task.assignee_id(), "task created");

        self.notify(
            &task,
            task.assignee_id(),
            NotificationKind::TaskAssigned,
            task.priority(),
            messages::task_assigned(actor.name(), task.title().as_str()),
        )
        .await;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// or [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Lists the tasks visible to `actor`, newest first.
    ///
    /// Employees see the tasks assigned to them; managers and document
    /// assistants see every task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn list_tasks(&self, actor: &Principal) -> TaskLifecycleResult<Vec<Task>> {
        let query = match actor.role() {
            Role::Manager | Role::DocAssistant => TaskQuery::all(),
            Role::Employee => TaskQuery::all().assigned_to(actor.id().clone()),
        };
        Ok(self.repository.list(&query).await?)
    }

    /// Lists tasks awaiting review, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Forbidden`] unless `actor` is a manager,
    /// or [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn review_queue(&self, actor: &Principal) -> TaskLifecycleResult<Vec<Task>> {
        if !actor.role().is_manager() {
            return Err(TaskLifecycleError::Forbidden {
                principal: actor.id().clone(),
                action: "view the review queue",
            });
        }
        let query = TaskQuery::all().with_status(TaskStatus::SubmittedForReview);
        Ok(self.repository.list(&query).await?)
    }

    /// Moves a task to the requested status.
    ///
    /// Checks run in order: target parses, task exists, the edge exists,
    /// the actor holds the edge's authority, rejection feedback is present.
    /// The status is then compare-and-set against the value read; a lost race
    /// is reported as an invalid transition from the stored status.
    ///
    /// Rejection feedback is stored as a comment by the reviewer and the
    /// assignee is notified, whichever manager rejects. Other transitions
    /// notify nobody.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an unknown target, an
    /// undefined edge, or missing feedback; [`TaskLifecycleError::NotFound`]
    /// when the task is absent; [`TaskLifecycleError::Forbidden`] when the
    /// actor lacks authority; [`TaskLifecycleError::Repository`] when
    /// persistence fails.
    pub async fn transition_task(
        &self,
        actor: &Principal,
        request: TransitionTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let target =
            TaskStatus::try_from(request.target.as_str()).map_err(TaskDomainError::from)?;
        let task = self.get_task(request.task_id).await?;
        let transition = task.transition_kind(target)?;

        let authorised = match transition.authority() {
            TransitionAuthority::Assignee => task.is_assignee(actor.id()),
            TransitionAuthority::Manager => actor.role().is_manager(),
        };
        if !authorised {
            return Err(TaskLifecycleError::Forbidden {
                principal: actor.id().clone(),
                action: transition.describe(),
            });
        }

        let comment = if transition.requires_feedback() {
            let text = request
                .feedback
                .and_then(|feedback| CommentText::new(feedback).ok())
                .ok_or(TaskDomainError::MissingRejectionFeedback(task.id()))?;
            Some(Comment::new(actor, text, &*self.clock))
        } else {
            None
        };
        let has_feedback = comment.is_some();

        let update = StatusUpdate {
            task_id: task.id(),
            expected: task.status(),
            next: target,
            comment,
            updated_at: self.clock.utc(),
        };
        let updated = match self.repository.update_status(&update).await {
            Ok(updated) => updated,
            Err(TaskRepositoryError::StatusConflict { task_id, actual, .. }) => {
                return Err(TaskDomainError::InvalidStateTransition {
                    task_id,
                    from: actual,
                    to: target,
                }
                .into());
            }
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(
            task_id = %updated.id(),
            from = %task.status(),
            to = %updated.status(),
            actor = %actor.id(),
            "task transitioned"
        );

        if has_feedback {
            self.notify(
                &updated,
                updated.assignee_id(),
                NotificationKind::Mention,
                Priority::default(),
                messages::changes_requested(actor.name(), updated.title().as_str()),
            )
            .await;
        }
        Ok(updated)
    }

    /// Appends a comment and notifies the other party.
    ///
    /// The recipient is the assignee when the creator comments, otherwise
    /// the creator. The notification is emitted only after the comment is
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for blank text,
    /// [`TaskLifecycleError::NotFound`] when the task is absent, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn add_comment(
        &self,
        actor: &Principal,
        request: AddCommentRequest,
    ) -> TaskLifecycleResult<Task> {
        let text = CommentText::new(request.text)?;
        let comment = Comment::new(actor, text, &*self.clock);
        let updated = self
            .repository
            .append_comment(request.task_id, &comment, self.clock.utc())
            .await
            .map_err(|err| match err {
                TaskRepositoryError::NotFound(task_id) => TaskLifecycleError::NotFound(task_id),
                other => other.into(),
            })?;
        tracing::debug!(
            task_id = %updated.id(),
            author = %actor.id(),
            comments = updated.comments().len(),
            "comment appended"
        );

        self.notify(
            &updated,
            updated.comment_recipient(actor.id()),
            NotificationKind::Mention,
            Priority::default(),
            messages::comment_added(actor.name(), updated.title().as_str()),
        )
        .await;
        Ok(updated)
    }

    async fn notify(
        &self,
        task: &Task,
        recipient: &PrincipalId,
        kind: NotificationKind,
        priority: Priority,
        rendered: Result<String, minijinja::Error>,
    ) {
        let message = match rendered {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!(
                    task_id = %task.id(),
                    recipient = %recipient,
                    %error,
                    "notification message failed to render"
                );
                return;
            }
        };
        let request = EmitNotification::new(recipient.clone(), message, kind)
            .with_priority(priority)
            .with_link(messages::task_link(task.id()));
        if let Err(error) = self.notifications.emit(request).await {
            tracing::warn!(
                task_id = %task.id(),
                recipient = %recipient,
                %error,
                "notification emit failed"
            );
        }
    }
}
