//! Shared helpers for `PostgreSQL` integration tests.

use deskflow::notification::adapters::postgres::PostgresNotificationRepository;
use deskflow::principal::domain::{Principal, PrincipalId, Role};
use deskflow::task::adapters::postgres::{PostgresTaskRepository, TaskPgPool};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::fixture;
use uuid::Uuid;

/// Names an external server that replaces the embedded cluster.
pub const TEST_DATABASE_URL_ENV: &str = "DESKFLOW_TEST_DATABASE_URL";

/// Database on the embedded cluster that hosts the per-test schemas.
const ADMIN_DATABASE: &str = "postgres";

/// SQL creating the task and notification tables.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_tasks_and_notifications/up.sql");

/// Boxed error type for fallible test setup.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// A migrated schema private to one test, dropped with the value.
pub struct IsolatedSchema {
    url: String,
    name: String,
    /// Pool whose connections resolve unqualified names in the schema.
    pub pool: TaskPgPool,
}

impl IsolatedSchema {
    /// Builds a task repository over the schema.
    #[must_use]
    pub fn tasks(&self) -> PostgresTaskRepository {
        PostgresTaskRepository::new(self.pool.clone())
    }

    /// Builds a notification repository over the schema.
    #[must_use]
    pub fn notifications(&self) -> PostgresNotificationRepository {
        PostgresNotificationRepository::new(self.pool.clone())
    }
}

impl Drop for IsolatedSchema {
    fn drop(&mut self) {
        if let Ok(mut conn) = PgConnection::establish(&self.url) {
            let _ = conn.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name));
        }
    }
}

fn create_schema(url: &str) -> Result<IsolatedSchema, BoxError> {
    let name = format!("deskflow_test_{}", Uuid::new_v4().simple());
    let mut admin = PgConnection::establish(url)?;
    admin.batch_execute(&format!("CREATE SCHEMA {name}"))?;

    let pool = Pool::builder()
        .max_size(8)
        .connection_customizer(Box::new(SearchPath(name.clone())))
        .build(ConnectionManager::<PgConnection>::new(url))?;
    pool.get()?.batch_execute(CREATE_SCHEMA_SQL)?;

    Ok(IsolatedSchema {
        url: url.to_owned(),
        name,
        pool,
    })
}

/// Resolves the server for these tests: the URL in
/// [`TEST_DATABASE_URL_ENV`] when set, otherwise the shared embedded cluster.
///
/// # Errors
///
/// Returns an error when the embedded cluster fails to start.
#[fixture]
pub fn database_url() -> Result<String, BoxError> {
    if let Ok(url) = std::env::var(TEST_DATABASE_URL_ENV) {
        return Ok(url);
    }
    // Cluster bootstrap blocks on its own runtime; keep it off the test runtime.
    // `TestCluster` is not `Sync`, so derive the URL on the bootstrap thread.
    std::thread::spawn(|| {
        let cluster: &'static TestCluster = shared_test_cluster();
        cluster.connection().database_url(ADMIN_DATABASE)
    })
    .join()
    .map_err(|_| BoxError::from("embedded PostgreSQL cluster failed to start"))
}

/// Provides a freshly migrated schema private to one test.
///
/// # Errors
///
/// Returns an error when the server is unreachable or migration fails.
#[fixture]
pub fn schema(database_url: Result<String, BoxError>) -> Result<IsolatedSchema, BoxError> {
    create_schema(&database_url?)
}

/// Builds a roster principal for tests.
#[must_use]
pub fn principal(id: &str, name: &str, role: Role) -> Principal {
    let principal_id = PrincipalId::new(id).expect("valid principal id");
    Principal::new(principal_id, name, role, "Operations").expect("valid principal")
}
