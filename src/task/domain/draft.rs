//! Unvalidated task input and its validation into [`NewTask`].

use super::{
    Deadline, DocumentId, NewTask, Priority, TaskDomainError, TaskStatus, TaskTitle,
};
use crate::principal::domain::PrincipalId;

/// Raw task fields as supplied by a caller.
///
/// Every field is optional so that missing input is reported as a
/// validation failure rather than rejected by the type system upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    title: Option<String>,
    description: Option<String>,
    assignee_id: Option<PrincipalId>,
    assignee: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    deadline: Option<String>,
    created_by: Option<PrincipalId>,
    document_id: Option<String>,
}

impl TaskDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee reference and display-name snapshot.
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: PrincipalId, name: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id);
        self.assignee = Some(name.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets an explicit initial status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Sets the creator.
    #[must_use]
    pub fn with_created_by(mut self, created_by: PrincipalId) -> Self {
        self.created_by = Some(created_by);
        self
    }

    /// Sets the linked document.
    #[must_use]
    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    /// Validates the draft.
    ///
    /// Priority defaults to medium. Status defaults to pending and may only
    /// be set to pending explicitly. Blank descriptions are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingField`] for the first absent required
    /// field, or the specific validation error of a malformed field.
    pub fn validate(self) -> Result<NewTask, TaskDomainError> {
        let title = TaskTitle::new(required(self.title, "title")?)?;
        let assignee_id = required(self.assignee_id, "assignee_id")?;
        let assignee_name = required(self.assignee, "assignee")?;
        let deadline = Deadline::parse(&required(self.deadline, "deadline")?)?;
        let created_by = required(self.created_by, "created_by")?;

        let trimmed_assignee = assignee_name.trim();
        if trimmed_assignee.is_empty() {
            return Err(TaskDomainError::EmptyAssigneeName);
        }

        let priority = self
            .priority
            .as_deref()
            .map(Priority::try_from)
            .transpose()?
            .unwrap_or_default();

        if let Some(raw_status) = self.status.as_deref() {
            let status = TaskStatus::try_from(raw_status)?;
            if status != TaskStatus::Pending {
                return Err(TaskDomainError::InvalidInitialStatus(status));
            }
        }

        let description = self
            .description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        let document_id = self.document_id.map(DocumentId::new).transpose()?;

        Ok(NewTask {
            title,
            description,
            assignee_id,
            assignee_name: trimmed_assignee.to_owned(),
            priority,
            deadline,
            created_by,
            document_id,
        })
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, TaskDomainError> {
    value.ok_or(TaskDomainError::MissingField(field))
}
