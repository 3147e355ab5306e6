//! Error types for notification validation and parsing.

use thiserror::Error;

/// Errors returned while constructing notifications.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationDomainError {
    /// The message is empty after trimming.
    #[error("notification message must not be empty")]
    EmptyMessage,

    /// The kind value is unsupported.
    #[error(transparent)]
    InvalidKind(#[from] ParseNotificationKindError),
}

/// Error returned while parsing notification kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification type: {0}")]
pub struct ParseNotificationKindError(pub String);
