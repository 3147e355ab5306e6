//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with their embedded comment thread.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Monotonic insertion counter used to break creation-time ties.
        insertion_order -> Int8,
        /// Task title.
        title -> Text,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Assigned principal.
        assignee_id -> Text,
        /// Assignee display name captured at assignment.
        assignee_name -> Text,
        /// Urgency.
        #[max_length = 16]
        priority -> Varchar,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Due date.
        deadline -> Timestamptz,
        /// Creating principal.
        created_by -> Text,
        /// Optional linked document.
        document_id -> Nullable<Text>,
        /// Append-only comment thread as a JSON array.
        comments -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
