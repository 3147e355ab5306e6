//! Given steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use deskflow::task::services::{CreateTaskRequest, TransitionTaskRequest};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#""{creator}" has assigned "{title}" to "{assignee}""#)]
fn task_assigned(
    world: &mut LifecycleWorld,
    creator: String,
    title: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let actor = world.principal(&creator)?;
    let target = world.principal(&assignee)?;
    let request =
        CreateTaskRequest::new(title, target.id().clone(), "2025-10-15").with_priority("high");
    let created = run_async(world.lifecycle.create_task(&actor, request))
        .wrap_err("create task for scenario")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#""{actor}" has moved the task to "{target}""#)]
fn task_moved(
    world: &mut LifecycleWorld,
    actor: String,
    target: String,
) -> Result<(), eyre::Report> {
    let principal = world.principal(&actor)?;
    let task_id = world.task()?.id();
    let moved = run_async(
        world
            .lifecycle
            .transition_task(&principal, TransitionTaskRequest::new(task_id, target)),
    )
    .wrap_err("transition task in scenario setup")?;
    world.task = Some(moved);
    Ok(())
}
