//! Application services for task lifecycle orchestration.

mod lifecycle;
mod messages;

pub use lifecycle::{
    AddCommentRequest, CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService, TransitionTaskRequest,
};
