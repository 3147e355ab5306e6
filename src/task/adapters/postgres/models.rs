//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: uuid::Uuid,
    /// Task title.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub title: String,
    /// Optional description.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub description: Option<String>,
    /// Assigned principal.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub assignee_id: String,
    /// Assignee name snapshot.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub assignee_name: String,
    /// Urgency.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub priority: String,
    /// Lifecycle status.
    #[diesel(sql_type = diesel::sql_types::Varchar)]
    pub status: String,
    /// Due date.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub deadline: DateTime<Utc>,
    /// Creating principal.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub created_by: String,
    /// Optional linked document.
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    pub document_id: Option<String>,
    /// Comment thread JSON array.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub comments: Value,
    /// Creation timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[diesel(sql_type = diesel::sql_types::Timestamptz)]
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Assigned principal.
    pub assignee_id: String,
    /// Assignee name snapshot.
    pub assignee_name: String,
    /// Urgency.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Due date.
    pub deadline: DateTime<Utc>,
    /// Creating principal.
    pub created_by: String,
    /// Optional linked document.
    pub document_id: Option<String>,
    /// Comment thread JSON array.
    pub comments: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
