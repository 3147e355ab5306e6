//! `PostgreSQL` repository implementation for notifications.

use super::{
    models::{NewNotificationRow, NotificationRow},
    schema::notifications,
};
use crate::notification::{
    domain::{Notification, NotificationId, NotificationKind, PersistedNotificationData},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};
use crate::principal::domain::PrincipalId;
use crate::task::domain::Priority;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by notification adapters.
pub type NotificationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed notification repository.
#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
    pool: NotificationPgPool,
}

impl PostgresNotificationRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: NotificationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> NotificationRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> NotificationRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(NotificationRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(NotificationRepositoryError::persistence)?
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn store(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let notification_id = notification.id();
        let new_row = to_new_row(notification);
        self.run_blocking(move |connection| {
            diesel::insert_into(notifications::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        NotificationRepositoryError::DuplicateNotification(notification_id)
                    }
                    _ => NotificationRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        self.run_blocking(move |connection| {
            let row = notifications::table
                .filter(notifications::id.eq(id.into_inner()))
                .select(NotificationRow::as_select())
                .first::<NotificationRow>(connection)
                .optional()
                .map_err(NotificationRepositoryError::persistence)?;
            row.map(row_to_notification).transpose()
        })
        .await
    }

    async fn list_for_user(
        &self,
        user_id: &PrincipalId,
        limit: usize,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        let recipient = user_id.as_str().to_owned();
        let row_limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.run_blocking(move |connection| {
            let rows = notifications::table
                .filter(notifications::user_id.eq(recipient))
                .order((
                    notifications::created_at.desc(),
                    notifications::insertion_order.desc(),
                ))
                .limit(row_limit)
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)
                .map_err(NotificationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_notification).collect()
        })
        .await
    }

    async fn count_unread(&self, user_id: &PrincipalId) -> NotificationRepositoryResult<usize> {
        let recipient = user_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let unread = notifications::table
                .filter(notifications::user_id.eq(recipient))
                .filter(notifications::is_read.eq(false))
                .count()
                .get_result::<i64>(connection)
                .map_err(NotificationRepositoryError::persistence)?;
            usize::try_from(unread).map_err(NotificationRepositoryError::persistence)
        })
        .await
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: &PrincipalId,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        let recipient = user_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = diesel::update(
                notifications::table
                    .filter(notifications::id.eq(id.into_inner()))
                    .filter(notifications::user_id.eq(recipient)),
            )
            .set(notifications::is_read.eq(true))
            .returning(NotificationRow::as_returning())
            .get_result::<NotificationRow>(connection)
            .optional()
            .map_err(NotificationRepositoryError::persistence)?;
            row.map(row_to_notification).transpose()
        })
        .await
    }

    async fn mark_all_read(&self, user_id: &PrincipalId) -> NotificationRepositoryResult<usize> {
        let recipient = user_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::update(
                notifications::table
                    .filter(notifications::user_id.eq(recipient))
                    .filter(notifications::is_read.eq(false)),
            )
            .set(notifications::is_read.eq(true))
            .execute(connection)
            .map_err(NotificationRepositoryError::persistence)
        })
        .await
    }
}

fn to_new_row(notification: &Notification) -> NewNotificationRow {
    NewNotificationRow {
        id: notification.id().into_inner(),
        user_id: notification.user_id().as_str().to_owned(),
        message: notification.message().to_owned(),
        kind: notification.kind().as_str().to_owned(),
        priority: notification.priority().as_str().to_owned(),
        is_read: notification.is_read(),
        link: notification.link().map(str::to_owned),
        created_at: notification.created_at(),
    }
}

fn row_to_notification(row: NotificationRow) -> NotificationRepositoryResult<Notification> {
    let NotificationRow {
        id,
        user_id,
        message,
        kind,
        priority,
        is_read,
        link,
        created_at,
    } = row;

    let data = PersistedNotificationData {
        id: NotificationId::from_uuid(id),
        user_id: PrincipalId::new(user_id).map_err(NotificationRepositoryError::persistence)?,
        message,
        kind: NotificationKind::try_from(kind.as_str())
            .map_err(NotificationRepositoryError::persistence)?,
        priority: Priority::try_from(priority.as_str())
            .map_err(NotificationRepositoryError::persistence)?,
        is_read,
        link,
        created_at,
    };
    Ok(Notification::from_persisted(data))
}
