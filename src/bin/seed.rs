//! Seeds a `PostgreSQL` database with a demonstration roster and task.
//!
//! Usage:
//!
//! ```text
//! deskflow-seed [config-path]
//! ```
//!
//! The database URL comes from `storage.database_url` or
//! `DESKFLOW_DATABASE_URL`. Existing task and notification tables are dropped
//! and recreated before seeding. When the configuration has no
//! `[[principals]]` roster, a built-in demonstration roster is used.

use deskflow::config::{self, ConfigError, PrincipalEntry};
use deskflow::notification::{
    adapters::postgres::PostgresNotificationRepository, services::NotificationService,
};
use deskflow::principal::{
    domain::{Principal, Role},
    ports::PrincipalDirectoryError,
};
use deskflow::task::{
    adapters::postgres::PostgresTaskRepository,
    services::{CreateTaskRequest, TaskLifecycleError, TaskLifecycleService},
};
use deskflow::telemetry::{self, TelemetryError};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::DefaultClock;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

const DROP_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_tasks_and_notifications/down.sql");
const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_tasks_and_notifications/up.sql");

#[derive(Debug, Error)]
enum SeedError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("no database configured; set DESKFLOW_DATABASE_URL or storage.database_url")]
    MissingDatabaseUrl,
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("schema setup failed: {0}")]
    Schema(#[from] diesel::result::Error),
    #[error("roster has no {0}")]
    MissingRole(&'static str),
    #[error(transparent)]
    Directory(#[from] PrincipalDirectoryError),
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),
}

#[tokio::main]
async fn main() -> Result<(), SeedError> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let mut settings = config::load_or_default(config_path.as_deref())?;
    telemetry::init_tracing(&settings.logging)?;

    if settings.principals.is_empty() {
        settings.principals = demo_roster();
    }
    let database_url = settings
        .storage
        .database_url
        .clone()
        .ok_or(SeedError::MissingDatabaseUrl)?;

    let pool = Pool::builder()
        .max_size(settings.storage.pool_size)
        .build(ConnectionManager::<PgConnection>::new(database_url))?;
    tracing::info!("recreating schema");
    pool.get()?.batch_execute(DROP_SCHEMA_SQL)?;
    pool.get()?.batch_execute(CREATE_SCHEMA_SQL)?;

    let roster = settings.roster()?;
    let manager = find_role(&roster, Role::Manager, "manager")?;
    let employee = find_role(&roster, Role::Employee, "employee")?;

    let clock = Arc::new(DefaultClock);
    let directory = Arc::new(settings.directory()?);
    let notifications = Arc::new(
        NotificationService::new(
            Arc::new(PostgresNotificationRepository::new(pool.clone())),
            Arc::clone(&directory),
            Arc::clone(&clock),
        )
        .with_list_limit(settings.notifications.list_limit),
    );
    let lifecycle = TaskLifecycleService::new(
        Arc::new(PostgresTaskRepository::new(pool)),
        notifications,
        directory,
        clock,
    );

    let task = lifecycle
        .create_task(
            manager,
            CreateTaskRequest::new(
                "Finalize Q4 Financial Reports",
                employee.id().clone(),
                "2025-10-15",
            )
            .with_description("Review and summarize the quarterly financial statements.")
            .with_priority("high"),
        )
        .await?;
    tracing::info!(
        task_id = %task.id(),
        assignee = %task.assignee_id(),
        principals = roster.len(),
        "seeded database"
    );
    Ok(())
}

fn find_role<'a>(
    roster: &'a [Principal],
    role: Role,
    label: &'static str,
) -> Result<&'a Principal, SeedError> {
    roster
        .iter()
        .find(|principal| principal.role() == role)
        .ok_or(SeedError::MissingRole(label))
}

fn demo_roster() -> Vec<PrincipalEntry> {
    [
        ("mgr1", "Arun Sharma", "manager", "Operations"),
        ("emp1", "Priya Verma", "employee", "Operations"),
        ("emp2", "Sunita Nair", "employee", "Safety"),
        ("doc1", "Vikram Singh", "doc_assistant", "Admin"),
    ]
    .into_iter()
    .map(|(id, name, role, department)| PrincipalEntry {
        id: id.to_owned(),
        name: name.to_owned(),
        role: role.to_owned(),
        department: department.to_owned(),
        token: None,
    })
    .collect()
}
