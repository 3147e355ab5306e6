//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::principal::domain::PrincipalId;
use crate::task::{
    domain::{
        Comment, Deadline, DocumentId, PersistedTaskData, Priority, Task, TaskDomainError, TaskId,
        TaskStatus, TaskTitle,
    },
    ports::{StatusUpdate, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Jsonb, Nullable, Timestamptz, Uuid as SqlUuid, Varchar};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

macro_rules! task_columns {
    () => {
        concat!(
            "id, title, description, assignee_id, assignee_name, priority, status, ",
            "deadline, created_by, document_id, comments, created_at, updated_at",
        )
    };
}

const APPEND_COMMENT_SQL: &str = concat!(
    "UPDATE tasks SET comments = comments || jsonb_build_array($2::jsonb), ",
    "updated_at = $3 WHERE id = $1 RETURNING ",
    task_columns!(),
);

const UPDATE_STATUS_SQL: &str = concat!(
    "UPDATE tasks SET status = $3, ",
    "comments = CASE WHEN $4::jsonb IS NULL THEN comments ",
    "ELSE comments || jsonb_build_array($4::jsonb) END, ",
    "updated_at = $5 WHERE id = $1 AND status = $2 RETURNING ",
    task_columns!(),
);

/// `PostgreSQL`-backed task repository.
///
/// Comment appends and status changes are single `UPDATE` statements, so
/// concurrent writers merge instead of overwriting each other.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let assignee = query.assignee_id.as_ref().map(|id| id.as_str().to_owned());
        let status = query.status;
        self.run_blocking(move |connection| {
            let mut statement = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(assignee_id) = assignee {
                statement = statement.filter(tasks::assignee_id.eq(assignee_id));
            }
            if let Some(wanted) = status {
                statement = statement.filter(tasks::status.eq(wanted.as_str()));
            }
            let rows = statement
                .order((tasks::created_at.desc(), tasks::insertion_order.desc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn append_comment(
        &self,
        id: TaskId,
        comment: &Comment,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let entry = serde_json::to_value(comment).map_err(TaskRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let row = diesel::sql_query(APPEND_COMMENT_SQL)
                .bind::<SqlUuid, _>(id.into_inner())
                .bind::<Jsonb, _>(entry)
                .bind::<Timestamptz, _>(updated_at)
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?
                .ok_or(TaskRepositoryError::NotFound(id))?;
            row_to_task(row)
        })
        .await
    }

    async fn update_status(&self, update: &StatusUpdate) -> TaskRepositoryResult<Task> {
        check_edge(update)?;
        let entry = update
            .comment
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?;
        let task_id = update.task_id;
        let expected = update.expected;
        let next = update.next;
        let updated_at = update.updated_at;

        self.run_blocking(move |connection| {
            let row = diesel::sql_query(UPDATE_STATUS_SQL)
                .bind::<SqlUuid, _>(task_id.into_inner())
                .bind::<Varchar, _>(expected.as_str())
                .bind::<Varchar, _>(next.as_str())
                .bind::<Nullable<Jsonb>, _>(entry)
                .bind::<Timestamptz, _>(updated_at)
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            if let Some(updated) = row {
                return row_to_task(updated);
            }

            let stored = tasks::table
                .filter(tasks::id.eq(task_id.into_inner()))
                .select(tasks::status)
                .first::<String>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?
                .ok_or(TaskRepositoryError::NotFound(task_id))?;
            let actual =
                TaskStatus::try_from(stored.as_str()).map_err(TaskRepositoryError::persistence)?;
            Err(TaskRepositoryError::StatusConflict {
                task_id,
                expected,
                actual,
            })
        })
        .await
    }
}

/// Rejects updates the lifecycle graph does not allow before touching the
/// database.
fn check_edge(update: &StatusUpdate) -> TaskRepositoryResult<()> {
    let kind = update.expected.transition_to(update.next).ok_or(
        TaskDomainError::InvalidStateTransition {
            task_id: update.task_id,
            from: update.expected,
            to: update.next,
        },
    )?;
    if kind.requires_feedback() && update.comment.is_none() {
        return Err(TaskDomainError::MissingRejectionFeedback(update.task_id).into());
    }
    Ok(())
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let comments =
        serde_json::to_value(task.comments()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        assignee_id: task.assignee_id().as_str().to_owned(),
        assignee_name: task.assignee_name().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        deadline: task.deadline().as_datetime(),
        created_by: task.created_by().as_str().to_owned(),
        document_id: task.document_id().map(|id| id.as_str().to_owned()),
        comments,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        assignee_id,
        assignee_name,
        priority,
        status,
        deadline,
        created_by,
        document_id,
        comments,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        assignee_id: PrincipalId::new(assignee_id).map_err(TaskRepositoryError::persistence)?,
        assignee_name,
        priority: Priority::try_from(priority.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        deadline: Deadline::from_datetime(deadline),
        created_by: PrincipalId::new(created_by).map_err(TaskRepositoryError::persistence)?,
        document_id: document_id
            .map(DocumentId::new)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        comments: parse_comments(comments)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn parse_comments(value: Value) -> TaskRepositoryResult<Vec<Comment>> {
    serde_json::from_value(value).map_err(TaskRepositoryError::persistence)
}
