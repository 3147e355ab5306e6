//! Notification engine service: emit, list, and read-state updates.

use crate::{
    error::ErrorKind,
    notification::{
        domain::{
            NewNotification, Notification, NotificationDomainError, NotificationId,
            NotificationKind,
        },
        ports::{NotificationRepository, NotificationRepositoryError},
    },
    principal::{
        domain::PrincipalId,
        ports::{PrincipalDirectory, PrincipalDirectoryError},
    },
    task::domain::Priority,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Number of notifications returned when the caller does not choose.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Request payload for emitting a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitNotification {
    user_id: PrincipalId,
    message: String,
    kind: NotificationKind,
    priority: Option<Priority>,
    link: Option<String>,
}

impl EmitNotification {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(user_id: PrincipalId, message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            user_id,
            message: message.into(),
            kind,
            priority: None,
            link: None,
        }
    }

    /// Sets the priority; medium when unset.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets an in-app link.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn user_id(&self) -> &PrincipalId {
        &self.user_id
    }
}

/// Service-level errors for notification operations.
#[derive(Debug, Error)]
pub enum NotificationServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] NotificationDomainError),

    /// The recipient could not be resolved.
    #[error(transparent)]
    Directory(#[from] PrincipalDirectoryError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] NotificationRepositoryError),

    /// No notification has the identifier.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// The notification belongs to a different principal.
    #[error("principal {principal} does not own notification {notification}")]
    Forbidden {
        /// The notification requested.
        notification: NotificationId,
        /// The principal that asked.
        principal: PrincipalId,
    },
}

impl NotificationServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Directory(PrincipalDirectoryError::NotFound(_)) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Directory(PrincipalDirectoryError::Domain(_)) => ErrorKind::Validation,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Directory(PrincipalDirectoryError::Unavailable(_)) | Self::Repository(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Result type for notification service operations.
pub type NotificationServiceResult<T> = Result<T, NotificationServiceError>;

/// Notification engine.
pub struct NotificationService<N, D, C>
where
    N: NotificationRepository,
    D: PrincipalDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<N>,
    directory: Arc<D>,
    clock: Arc<C>,
    list_limit: usize,
}

impl<N, D, C> NotificationService<N, D, C>
where
    N: NotificationRepository,
    D: PrincipalDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a notification service with the default list limit.
    #[must_use]
    pub const fn new(repository: Arc<N>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Overrides the default list limit. Zero keeps the built-in default.
    #[must_use]
    pub const fn with_list_limit(mut self, list_limit: usize) -> Self {
        if list_limit > 0 {
            self.list_limit = list_limit;
        }
        self
    }

    /// Creates and stores a notification for a known principal.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationServiceError::Directory`] when the recipient is
    /// unknown, [`NotificationServiceError::Domain`] for a blank message, or
    /// [`NotificationServiceError::Repository`] when persistence fails.
    pub async fn emit(&self, request: EmitNotification) -> NotificationServiceResult<Notification> {
        let recipient = self.directory.resolve(&request.user_id).await?;
        let notification = Notification::new(
            NewNotification {
                user_id: recipient.id().clone(),
                message: request.message,
                kind: request.kind,
                priority: request.priority.unwrap_or_default(),
                link: request.link,
            },
            &*self.clock,
        )?;
        self.repository.store(&notification).await?;
        tracing::debug!(
            notification_id = %notification.id(),
            recipient = %notification.user_id(),
            kind = %notification.kind(),
            "notification emitted"
        );
        Ok(notification)
    }

    /// Lists a principal's notifications, newest first.
    ///
    /// `None` or zero uses the configured default limit.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationServiceError::Repository`] when lookup fails.
    pub async fn list_for_user(
        &self,
        user_id: &PrincipalId,
        limit: Option<usize>,
    ) -> NotificationServiceResult<Vec<Notification>> {
        let effective = limit.filter(|value| *value > 0).unwrap_or(self.list_limit);
        Ok(self.repository.list_for_user(user_id, effective).await?)
    }

    /// Counts a principal's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationServiceError::Repository`] when lookup fails.
    pub async fn unread_count(&self, user_id: &PrincipalId) -> NotificationServiceResult<usize> {
        Ok(self.repository.count_unread(user_id).await?)
    }

    /// Marks one notification read on behalf of its owner.
    ///
    /// Marking an already-read notification succeeds without change.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationServiceError::NotFound`] when the notification
    /// does not exist and [`NotificationServiceError::Forbidden`] when it
    /// belongs to someone else.
    pub async fn mark_read(
        &self,
        id: NotificationId,
        user_id: &PrincipalId,
    ) -> NotificationServiceResult<Notification> {
        if let Some(updated) = self.repository.mark_read(id, user_id).await? {
            return Ok(updated);
        }
        match self.repository.find_by_id(id).await? {
            Some(_) => Err(NotificationServiceError::Forbidden {
                notification: id,
                principal: user_id.clone(),
            }),
            None => Err(NotificationServiceError::NotFound(id)),
        }
    }

    /// Marks every unread notification of a principal read.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationServiceError::Repository`] when the update
    /// fails.
    pub async fn mark_all_read(&self, user_id: &PrincipalId) -> NotificationServiceResult<usize> {
        let changed = self.repository.mark_all_read(user_id).await?;
        tracing::debug!(recipient = %user_id, changed, "notifications marked read");
        Ok(changed)
    }
}
