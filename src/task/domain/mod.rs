//! Domain model for the task lifecycle.
//!
//! Tasks carry a denormalised snapshot of the assignee's display name, an
//! append-only comment thread, and a status governed by a fixed transition
//! graph. All infrastructure concerns stay outside this boundary.

mod comment;
mod draft;
mod error;
mod fields;
mod ids;
mod priority;
mod status;
mod task;

pub use comment::{Comment, CommentText};
pub use draft::TaskDraft;
pub use error::{ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use fields::{Deadline, TaskTitle};
pub use ids::{DocumentId, TaskId};
pub use priority::Priority;
pub use status::{TaskStatus, TransitionAuthority, TransitionKind};
pub use task::{NewTask, PersistedTaskData, Task};
