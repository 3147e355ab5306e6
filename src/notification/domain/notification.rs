//! Notification record.

use super::{NotificationDomainError, NotificationId, NotificationKind};
use crate::principal::domain::PrincipalId;
use crate::task::domain::Priority;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Fields for a notification about to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Recipient.
    pub user_id: PrincipalId,
    /// Human-readable message.
    pub message: String,
    /// Category.
    pub kind: NotificationKind,
    /// Urgency.
    pub priority: Priority,
    /// Optional in-app link.
    pub link: Option<String>,
}

/// A message addressed to one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    user_id: PrincipalId,
    message: String,
    #[serde(rename = "type")]
    kind: NotificationKind,
    priority: Priority,
    is_read: bool,
    link: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNotificationData {
    /// Persisted identifier.
    pub id: NotificationId,
    /// Persisted recipient.
    pub user_id: PrincipalId,
    /// Persisted message.
    pub message: String,
    /// Persisted category.
    pub kind: NotificationKind,
    /// Persisted urgency.
    pub priority: Priority,
    /// Persisted read flag.
    pub is_read: bool,
    /// Persisted link.
    pub link: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification.
    ///
    /// Blank links are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationDomainError::EmptyMessage`] when the message is
    /// blank.
    pub fn new(
        fields: NewNotification,
        clock: &impl Clock,
    ) -> Result<Self, NotificationDomainError> {
        let message = fields.message.trim();
        if message.is_empty() {
            return Err(NotificationDomainError::EmptyMessage);
        }
        let link = fields
            .link
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            id: NotificationId::new(),
            user_id: fields.user_id,
            message: message.to_owned(),
            kind: fields.kind,
            priority: fields.priority,
            is_read: false,
            link,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNotificationData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            message: data.message,
            kind: data.kind,
            priority: data.priority,
            is_read: data.is_read,
            link: data.link,
            created_at: data.created_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn user_id(&self) -> &PrincipalId {
        &self.user_id
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the category.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the urgency.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns `true` once the recipient has read the notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns the link, if any.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when `principal` owns this notification.
    #[must_use]
    pub fn is_owned_by(&self, principal: &PrincipalId) -> bool {
        &self.user_id == principal
    }

    /// Marks the notification read. Returns `true` if it was unread.
    pub const fn mark_read(&mut self) -> bool {
        let was_unread = !self.is_read;
        self.is_read = true;
        was_unread
    }
}
