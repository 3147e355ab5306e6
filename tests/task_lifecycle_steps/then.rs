//! Then steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use deskflow::error::ErrorKind;
use deskflow::notification::domain::NotificationKind;
use deskflow::task::domain::TaskStatus;
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn transition_error_kind(world: &LifecycleWorld) -> Result<ErrorKind, eyre::Report> {
    let result = world
        .last_transition_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;
    match result {
        Ok(task) => Err(eyre::eyre!(
            "expected the transition to fail, task is {}",
            task.status()
        )),
        Err(err) => Ok(err.kind()),
    }
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &LifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.task()?.id();
    let stored = run_async(world.lifecycle.get_task(task_id)).wrap_err("reload task")?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then("the transition fails with an invalid transition error")]
fn fails_with_invalid_transition(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let kind = transition_error_kind(world)?;
    eyre::ensure!(
        kind == ErrorKind::InvalidTransition,
        "expected invalid_transition, got {}",
        kind.as_str()
    );
    Ok(())
}

#[then("the transition fails with a validation error")]
fn fails_with_validation(world: &LifecycleWorld) -> Result<(), eyre::Report> {
    let kind = transition_error_kind(world)?;
    eyre::ensure!(
        kind == ErrorKind::Validation,
        "expected validation, got {}",
        kind.as_str()
    );
    Ok(())
}

#[then(r#"the latest comment reads "{text}""#)]
fn latest_comment_reads(world: &LifecycleWorld, text: String) -> Result<(), eyre::Report> {
    let comment = world
        .task()?
        .comments()
        .last()
        .ok_or_else(|| eyre::eyre!("task has no comments"))?;
    eyre::ensure!(
        comment.text().as_str() == text,
        "expected comment {text:?}, found {:?}",
        comment.text().as_str()
    );
    Ok(())
}

#[then(r#""{user}" has {count:u64} unread notifications"#)]
fn unread_notifications(
    world: &LifecycleWorld,
    user: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let principal = world.principal(&user)?;
    let unread = run_async(world.notifications.unread_count(principal.id()))
        .wrap_err("count unread notifications")?;
    let expected = usize::try_from(count).wrap_err("count fits usize")?;
    eyre::ensure!(
        unread == expected,
        "expected {expected} unread for {user}, found {unread}"
    );
    Ok(())
}

#[then(r#"the latest notification for "{user}" is a "{kind}" mentioning "{fragment}""#)]
fn latest_notification(
    world: &LifecycleWorld,
    user: String,
    kind: String,
    fragment: String,
) -> Result<(), eyre::Report> {
    let expected_kind = NotificationKind::try_from(kind.as_str())
        .map_err(|err| eyre::eyre!("invalid kind in scenario: {err}"))?;
    let principal = world.principal(&user)?;
    let inbox = run_async(world.notifications.list_for_user(principal.id(), Some(1)))
        .wrap_err("list notifications")?;
    let latest = inbox
        .first()
        .ok_or_else(|| eyre::eyre!("{user} has no notifications"))?;

    eyre::ensure!(
        latest.kind() == expected_kind,
        "expected {expected_kind}, found {}",
        latest.kind()
    );
    eyre::ensure!(
        latest.message().contains(fragment.as_str()),
        "message {:?} does not mention {fragment:?}",
        latest.message()
    );
    Ok(())
}
