//! When steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use deskflow::task::services::{AddCommentRequest, TransitionTaskRequest};
use eyre::WrapErr;
use rstest_bdd_macros::when;

fn record_transition(
    world: &mut LifecycleWorld,
    actor: &str,
    request: TransitionTaskRequest,
) -> Result<(), eyre::Report> {
    let principal = world.principal(actor)?;
    let result = run_async(world.lifecycle.transition_task(&principal, request));
    if let Ok(ref updated) = result {
        world.task = Some(updated.clone());
    }
    world.last_transition_result = Some(result);
    Ok(())
}

#[when(r#""{actor}" moves the task to "{target}""#)]
fn move_task(
    world: &mut LifecycleWorld,
    actor: String,
    target: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    record_transition(world, &actor, TransitionTaskRequest::new(task_id, target))
}

#[when(r#""{actor}" rejects the task with feedback "{feedback}""#)]
fn reject_task(
    world: &mut LifecycleWorld,
    actor: String,
    feedback: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let request = TransitionTaskRequest::new(task_id, "working").with_feedback(feedback);
    record_transition(world, &actor, request)
}

#[when(r#""{author}" comments "{text}""#)]
fn comment_on_task(
    world: &mut LifecycleWorld,
    author: String,
    text: String,
) -> Result<(), eyre::Report> {
    let principal = world.principal(&author)?;
    let task_id = world.task()?.id();
    let updated = run_async(
        world
            .lifecycle
            .add_comment(&principal, AddCommentRequest::new(task_id, text)),
    )
    .wrap_err("add comment in scenario")?;
    world.task = Some(updated);
    Ok(())
}
