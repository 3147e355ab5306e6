//! In-memory notification store.

mod notification;

pub use notification::InMemoryNotificationRepository;
