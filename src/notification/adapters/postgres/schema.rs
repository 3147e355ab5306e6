//! Diesel schema for notification persistence.

diesel::table! {
    /// Notification records.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Monotonic insertion counter used to break creation-time ties.
        insertion_order -> Int8,
        /// Recipient.
        user_id -> Text,
        /// Human-readable message.
        message -> Text,
        /// Category.
        #[max_length = 32]
        kind -> Varchar,
        /// Urgency.
        #[max_length = 16]
        priority -> Varchar,
        /// Read flag.
        is_read -> Bool,
        /// Optional in-app link.
        link -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
