//! In-memory repository for notification tests.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::notification::{
    domain::{Notification, NotificationId},
    ports::{NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult},
};
use crate::principal::domain::PrincipalId;

/// Thread-safe in-memory notification repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationRepository {
    state: Arc<RwLock<InMemoryNotificationState>>,
}

#[derive(Debug, Default)]
struct InMemoryNotificationState {
    notifications: HashMap<NotificationId, Notification>,
    // Insertion order per recipient; newest last.
    recipient_index: HashMap<PrincipalId, Vec<NotificationId>>,
}

impl InMemoryNotificationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(
        &self,
    ) -> NotificationRepositoryResult<RwLockReadGuard<'_, InMemoryNotificationState>> {
        self.state.read().map_err(|err| {
            NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> NotificationRepositoryResult<RwLockWriteGuard<'_, InMemoryNotificationState>> {
        self.state.write().map_err(|err| {
            NotificationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn owned_ids(state: &InMemoryNotificationState, user_id: &PrincipalId) -> Vec<NotificationId> {
    state
        .recipient_index
        .get(user_id)
        .cloned()
        .unwrap_or_default()
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn store(&self, notification: &Notification) -> NotificationRepositoryResult<()> {
        let mut state = self.write()?;
        if state.notifications.contains_key(&notification.id()) {
            return Err(NotificationRepositoryError::DuplicateNotification(
                notification.id(),
            ));
        }
        state
            .recipient_index
            .entry(notification.user_id().clone())
            .or_default()
            .push(notification.id());
        state
            .notifications
            .insert(notification.id(), notification.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: NotificationId,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        let state = self.read()?;
        Ok(state.notifications.get(&id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &PrincipalId,
        limit: usize,
    ) -> NotificationRepositoryResult<Vec<Notification>> {
        let state = self.read()?;
        let mut owned: Vec<(usize, &Notification)> = owned_ids(&state, user_id)
            .iter()
            .enumerate()
            .filter_map(|(position, id)| {
                state
                    .notifications
                    .get(id)
                    .map(|notification| (position, notification))
            })
            .collect();
        owned.sort_by_key(|(position, notification)| {
            Reverse((notification.created_at(), *position))
        });
        Ok(owned
            .into_iter()
            .take(limit)
            .map(|(_, notification)| notification.clone())
            .collect())
    }

    async fn count_unread(&self, user_id: &PrincipalId) -> NotificationRepositoryResult<usize> {
        let state = self.read()?;
        Ok(owned_ids(&state, user_id)
            .iter()
            .filter_map(|id| state.notifications.get(id))
            .filter(|notification| !notification.is_read())
            .count())
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: &PrincipalId,
    ) -> NotificationRepositoryResult<Option<Notification>> {
        let mut state = self.write()?;
        let Some(notification) = state
            .notifications
            .get_mut(&id)
            .filter(|notification| notification.is_owned_by(user_id))
        else {
            return Ok(None);
        };
        notification.mark_read();
        Ok(Some(notification.clone()))
    }

    async fn mark_all_read(&self, user_id: &PrincipalId) -> NotificationRepositoryResult<usize> {
        let mut state = self.write()?;
        let ids = owned_ids(&state, user_id);
        let mut changed = 0_usize;
        for id in ids {
            let flipped = state
                .notifications
                .get_mut(&id)
                .is_some_and(Notification::mark_read);
            if flipped {
                changed = changed.saturating_add(1);
            }
        }
        Ok(changed)
    }
}
