//! Repository port for notification persistence and read-state updates.

use crate::notification::domain::{Notification, NotificationId};
use crate::principal::domain::PrincipalId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification repository operations.
pub type NotificationRepositoryResult<T> = Result<T, NotificationRepositoryError>;

/// Notification persistence contract.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Stores a new notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::DuplicateNotification`] when the
    /// identifier already exists.
    async fn store(&self, notification: &Notification) -> NotificationRepositoryResult<()>;

    /// Finds a notification by identifier.
    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> NotificationRepositoryResult<Option<Notification>>;

    /// Lists at most `limit` notifications for `user_id`, newest first.
    async fn list_for_user(
        &self,
        user_id: &PrincipalId,
        limit: usize,
    ) -> NotificationRepositoryResult<Vec<Notification>>;

    /// Counts unread notifications for `user_id`.
    async fn count_unread(&self, user_id: &PrincipalId) -> NotificationRepositoryResult<usize>;

    /// Sets the read flag on one notification owned by `user_id`.
    ///
    /// Returns `None` when no notification with the identifier is owned by
    /// `user_id`. Already-read notifications are returned unchanged.
    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: &PrincipalId,
    ) -> NotificationRepositoryResult<Option<Notification>>;

    /// Sets the read flag on every unread notification owned by `user_id`
    /// and returns how many changed.
    async fn mark_all_read(&self, user_id: &PrincipalId) -> NotificationRepositoryResult<usize>;
}

/// Errors returned by notification repository implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationRepositoryError {
    /// A notification with the same identifier already exists.
    #[error("duplicate notification identifier: {0}")]
    DuplicateNotification(NotificationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
