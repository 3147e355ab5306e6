//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::principal::domain::PrincipalId;
use crate::task::{
    domain::{Comment, Task, TaskId, TaskStatus},
    ports::{StatusUpdate, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Every mutation happens under a single write lock, which makes comment
/// appends and status compare-and-set atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, StoredTask>,
    assignee_index: HashMap<PrincipalId, Vec<TaskId>>,
    status_index: HashMap<TaskStatus, Vec<TaskId>>,
    next_sequence: u64,
}

#[derive(Debug)]
struct StoredTask {
    sequence: u64,
    task: Task,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Removes a task ID from a keyed index, cleaning up the entry if empty.
fn remove_from_index<K>(index: &mut HashMap<K, Vec<TaskId>>, key: &K, task_id: TaskId)
where
    K: std::hash::Hash + Eq,
{
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|id| *id != task_id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

/// Picks the narrowest index for the query, or `None` for a full scan.
fn candidate_ids(state: &InMemoryTaskState, query: &TaskQuery) -> Option<Vec<TaskId>> {
    if let Some(assignee) = query.assignee_id.as_ref() {
        return Some(
            state
                .assignee_index
                .get(assignee)
                .cloned()
                .unwrap_or_default(),
        );
    }
    query.status.map(|status| {
        state
            .status_index
            .get(&status)
            .cloned()
            .unwrap_or_default()
    })
}

fn append_in_place(
    state: &mut InMemoryTaskState,
    id: TaskId,
    comment: &Comment,
    updated_at: DateTime<Utc>,
) -> TaskRepositoryResult<Task> {
    let stored = state
        .tasks
        .get_mut(&id)
        .ok_or(TaskRepositoryError::NotFound(id))?;
    stored.task.append_comment(comment.clone(), updated_at);
    Ok(stored.task.clone())
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }

        let sequence = state.next_sequence;
        state.next_sequence = sequence.saturating_add(1);
        state
            .assignee_index
            .entry(task.assignee_id().clone())
            .or_default()
            .push(task.id());
        state
            .status_index
            .entry(task.status())
            .or_default()
            .push(task.id());
        state.tasks.insert(
            task.id(),
            StoredTask {
                sequence,
                task: task.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).map(|stored| stored.task.clone()))
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut matches: Vec<&StoredTask> = match candidate_ids(&state, query) {
            Some(ids) => ids.iter().filter_map(|id| state.tasks.get(id)).collect(),
            None => state.tasks.values().collect(),
        };
        matches.retain(|stored| query.matches(&stored.task));
        matches.sort_by_key(|stored| Reverse((stored.task.created_at(), stored.sequence)));
        Ok(matches.into_iter().map(|stored| stored.task.clone()).collect())
    }

    async fn append_comment(
        &self,
        id: TaskId,
        comment: &Comment,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.write()?;
        append_in_place(&mut state, id, comment, updated_at)
    }

    async fn update_status(&self, update: &StatusUpdate) -> TaskRepositoryResult<Task> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(&update.task_id)
            .ok_or(TaskRepositoryError::NotFound(update.task_id))?;

        let actual = stored.task.status();
        if actual != update.expected {
            return Err(TaskRepositoryError::StatusConflict {
                task_id: update.task_id,
                expected: update.expected,
                actual,
            });
        }

        stored
            .task
            .apply_transition(update.next, update.comment.clone(), update.updated_at)?;
        let updated = stored.task.clone();

        remove_from_index(&mut state.status_index, &actual, update.task_id);
        state
            .status_index
            .entry(update.next)
            .or_default()
            .push(update.task_id);
        Ok(updated)
    }
}
