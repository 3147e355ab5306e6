//! Application services for the notification engine.

mod engine;

pub use engine::{
    DEFAULT_LIST_LIMIT, EmitNotification, NotificationService, NotificationServiceError,
    NotificationServiceResult,
};
