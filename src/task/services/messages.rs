//! Notification message templates for task lifecycle events.

use minijinja::{Environment, context};

const TASK_ASSIGNED: &str = r#"New task from {{ creator }}: "{{ title }}""#;
const COMMENT_ADDED: &str = r#"{{ author }} commented on: "{{ title }}""#;
const CHANGES_REQUESTED: &str = r#"{{ reviewer }} requested changes on: "{{ title }}""#;

/// Renders the message sent to an assignee when a task is created.
pub(crate) fn task_assigned(creator: &str, title: &str) -> Result<String, minijinja::Error> {
    Environment::new().render_str(TASK_ASSIGNED, context! { creator, title })
}

/// Renders the message sent to the other party when a comment is added.
pub(crate) fn comment_added(author: &str, title: &str) -> Result<String, minijinja::Error> {
    Environment::new().render_str(COMMENT_ADDED, context! { author, title })
}

/// Renders the message sent to the assignee when a submission is rejected.
pub(crate) fn changes_requested(reviewer: &str, title: &str) -> Result<String, minijinja::Error> {
    Environment::new().render_str(CHANGES_REQUESTED, context! { reviewer, title })
}

/// Returns the in-app link for a task.
pub(crate) fn task_link(task_id: impl std::fmt::Display) -> String {
    format!("/tasks/{task_id}")
}
