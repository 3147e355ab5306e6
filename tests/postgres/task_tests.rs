//! `PostgreSQL` integration tests for task storage and the lifecycle service.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use deskflow::notification::{
    adapters::postgres::PostgresNotificationRepository, services::NotificationService,
};
use deskflow::principal::{adapters::memory::InMemoryPrincipalDirectory, domain::Role};
use deskflow::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{Comment, CommentText, DocumentId, TaskDomainError, TaskId, TaskStatus},
    ports::{StatusUpdate, TaskQuery, TaskRepository, TaskRepositoryError},
    services::{AddCommentRequest, CreateTaskRequest, TaskLifecycleService, TransitionTaskRequest},
};
use diesel::prelude::*;
use diesel::sql_types::Uuid as SqlUuid;
use mockable::DefaultClock;
use rstest::rstest;

use crate::postgres::helpers::{BoxError, IsolatedSchema, principal, schema};

type PgLifecycle = TaskLifecycleService<
    PostgresTaskRepository,
    PostgresNotificationRepository,
    InMemoryPrincipalDirectory,
    DefaultClock,
>;

struct Office {
    lifecycle: Arc<PgLifecycle>,
    tasks: PostgresTaskRepository,
    schema: IsolatedSchema,
}

fn office(schema: IsolatedSchema) -> Result<Office, BoxError> {
    let directory = Arc::new(InMemoryPrincipalDirectory::with_principals([
        principal("mgr1", "Arun Sharma", Role::Manager),
        principal("emp1", "Priya Verma", Role::Employee),
    ])?);
    let clock = Arc::new(DefaultClock);
    let notifications = Arc::new(NotificationService::new(
        Arc::new(schema.notifications()),
        Arc::clone(&directory),
        Arc::clone(&clock),
    ));
    let lifecycle = Arc::new(TaskLifecycleService::new(
        Arc::new(schema.tasks()),
        notifications,
        directory,
        clock,
    ));
    Ok(Office {
        lifecycle,
        tasks: schema.tasks(),
        schema,
    })
}

async fn assign_report(office: &Office) -> Result<deskflow::task::domain::Task, BoxError> {
    let manager = principal("mgr1", "Arun Sharma", Role::Manager);
    let request = CreateTaskRequest::new(
        "Finalize Q4 Financial Reports",
        principal("emp1", "Priya Verma", Role::Employee).id().clone(),
        "2025-10-15",
    )
    .with_description("Review and summarize the quarterly financial statements.")
    .with_priority("high");
    Ok(office.lifecycle.create_task(&manager, request).await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_task_round_trips(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let office = office(isolated)?;
    let created = assign_report(&office).await?;

    let found = office
        .tasks
        .find_by_id(created.id())
        .await?
        .ok_or("stored task should be found")?;

    assert_eq!(found.title(), created.title());
    assert_eq!(found.assignee_name(), "Priya Verma");
    assert_eq!(found.status(), TaskStatus::Pending);
    assert_eq!(found.deadline(), created.deadline());
    assert_eq!(
        found.description(),
        Some("Review and summarize the quarterly financial statements.")
    );
    assert!(found.comments().is_empty());
    assert!(office.tasks.find_by_id(TaskId::new()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn long_free_text_fields_are_stored_whole(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let office = office(isolated)?;
    let title = "Quarterly reconciliation ".repeat(20);
    let document_id = format!("archive/{}", "finance-".repeat(40));
    let request = CreateTaskRequest::new(
        title.as_str(),
        principal("emp1", "Priya Verma", Role::Employee).id().clone(),
        "2025-10-15",
    )
    .with_document_id(document_id.as_str());

    let created = office
        .lifecycle
        .create_task(&principal("mgr1", "Arun Sharma", Role::Manager), request)
        .await?;
    let found = office
        .tasks
        .find_by_id(created.id())
        .await?
        .ok_or("stored task should be found")?;

    assert!(title.trim().len() > 255);
    assert_eq!(found.title().as_str(), title.trim());
    assert_eq!(
        found.document_id().map(DocumentId::as_str),
        Some(document_id.as_str())
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_identifier_is_rejected(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let office = office(isolated)?;
    let created = assign_report(&office).await?;

    let duplicate = office.tasks.store(&created).await;

    assert!(matches!(
        duplicate,
        Err(TaskRepositoryError::DuplicateTask(id)) if id == created.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_and_orders_newest_first(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let office = office(isolated)?;
    let first = assign_report(&office).await?;
    let second = assign_report(&office).await?;
    let employee = principal("emp1", "Priya Verma", Role::Employee);
    office
        .lifecycle
        .transition_task(&employee, TransitionTaskRequest::new(first.id(), "working"))
        .await?;

    let all = office.tasks.list(&TaskQuery::all()).await?;
    let working = office
        .tasks
        .list(&TaskQuery::all().with_status(TaskStatus::Working))
        .await?;
    let manager = principal("mgr1", "Arun Sharma", Role::Manager);
    let for_manager = office
        .tasks
        .list(&TaskQuery::all().assigned_to(manager.id().clone()))
        .await?;

    let ids: Vec<TaskId> = all.iter().map(|task| task.id()).collect();
    assert_eq!(ids, vec![second.id(), first.id()]);
    assert_eq!(working.len(), 1);
    assert!(for_manager.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_appends_are_all_kept(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    const WRITERS: usize = 16;
    let isolated = schema?;
    let office = office(isolated)?;
    let created = assign_report(&office).await?;

    let mut handles = Vec::with_capacity(WRITERS);
    for writer in 0..WRITERS {
        let lifecycle = Arc::clone(&office.lifecycle);
        let task_id = created.id();
        let author = if writer % 2 == 0 {
            principal("mgr1", "Arun Sharma", Role::Manager)
        } else {
            principal("emp1", "Priya Verma", Role::Employee)
        };
        handles.push(tokio::spawn(async move {
            lifecycle
                .add_comment(
                    &author,
                    AddCommentRequest::new(task_id, format!("note {writer}")),
                )
                .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let stored = office
        .tasks
        .find_by_id(created.id())
        .await?
        .ok_or("task should exist")?;
    let texts: HashSet<&str> = stored
        .comments()
        .iter()
        .map(|comment| comment.text().as_str())
        .collect();
    assert_eq!(stored.comments().len(), WRITERS);
    assert_eq!(texts.len(), WRITERS);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn append_to_missing_task_is_not_found(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let office = office(isolated)?;
    let missing = TaskId::new();
    let comment = Comment::new(
        &principal("mgr1", "Arun Sharma", Role::Manager),
        CommentText::new("hello")?,
        &DefaultClock,
    );

    let outcome = office.tasks.append_comment(missing, &comment, Utc::now()).await;

    assert!(matches!(outcome, Err(TaskRepositoryError::NotFound(id)) if id == missing));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_stored_comment_fails_to_load(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let office = office(isolated)?;
    let created = assign_report(&office).await?;
    let pool = office.schema.pool.clone();
    let task_uuid = created.id().into_inner();
    tokio::task::spawn_blocking(move || -> Result<usize, BoxError> {
        let mut conn = pool.get()?;
        Ok(diesel::sql_query(concat!(
            "UPDATE tasks SET comments = jsonb_build_array(jsonb_build_object(",
            "'by', 'mgr1', 'name', 'Arun Sharma', 'text', '   ', ",
            "'timestamp', '2025-10-01T09:00:00Z')) WHERE id = $1",
        ))
        .bind::<SqlUuid, _>(task_uuid)
        .execute(&mut conn)?)
    })
    .await??;

    let outcome = office.tasks.find_by_id(created.id()).await;

    assert!(matches!(outcome, Err(TaskRepositoryError::Persistence(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_status_update_conflicts(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let office = office(isolated)?;
    let created = assign_report(&office).await?;
    let start = StatusUpdate {
        task_id: created.id(),
        expected: TaskStatus::Pending,
        next: TaskStatus::Working,
        comment: None,
        updated_at: Utc::now(),
    };

    let started = office.tasks.update_status(&start).await?;
    let replayed = office.tasks.update_status(&start).await;

    assert_eq!(started.status(), TaskStatus::Working);
    assert!(matches!(
        replayed,
        Err(TaskRepositoryError::StatusConflict {
            expected: TaskStatus::Pending,
            actual: TaskStatus::Working,
            ..
        })
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undefined_edge_is_rejected_without_writing(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let office = office(isolated)?;
    let created = assign_report(&office).await?;
    let skip = StatusUpdate {
        task_id: created.id(),
        expected: TaskStatus::Pending,
        next: TaskStatus::Completed,
        comment: None,
        updated_at: Utc::now(),
    };

    let outcome = office.tasks.update_status(&skip).await;

    assert!(matches!(
        outcome,
        Err(TaskRepositoryError::Rejected(
            TaskDomainError::InvalidStateTransition { .. }
        ))
    ));
    let stored = office
        .tasks
        .find_by_id(created.id())
        .await?
        .ok_or("task should exist")?;
    assert_eq!(stored.status(), TaskStatus::Pending);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejection_stores_feedback_atomically(
    schema: Result<IsolatedSchema, BoxError>,
) -> Result<(), BoxError> {
    let isolated = schema?;
    let office = office(isolated)?;
    let created = assign_report(&office).await?;
    let manager = principal("mgr1", "Arun Sharma", Role::Manager);
    let employee = principal("emp1", "Priya Verma", Role::Employee);
    for target in ["working", "submitted_for_review"] {
        office
            .lifecycle
            .transition_task(&employee, TransitionTaskRequest::new(created.id(), target))
            .await?;
    }

    let rejected = office
        .lifecycle
        .transition_task(
            &manager,
            TransitionTaskRequest::new(created.id(), "working").with_feedback("needs revision"),
        )
        .await?;

    let stored = office
        .tasks
        .find_by_id(created.id())
        .await?
        .ok_or("task should exist")?;
    assert_eq!(rejected.status(), TaskStatus::Working);
    assert_eq!(stored.status(), TaskStatus::Working);
    let feedback = stored.comments().first().ok_or("feedback should be stored")?;
    assert_eq!(feedback.text().as_str(), "needs revision");
    assert_eq!(feedback.name(), "Arun Sharma");
    Ok(())
}
