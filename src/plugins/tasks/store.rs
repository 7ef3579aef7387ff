//! Per-user task lists with synchronized persistence.
//!
//! [`TaskStore`] keeps every loaded user's list in memory and writes the full
//! list to the key-value store after each mutation. A mutation is computed on
//! a copy, written, and only then installed in memory, so a failed write
//! leaves the cached list untouched.
//!
//! Loads and mutations for one user are serialized behind that user's async
//! lock: a second mutation waits for the first one's write before it reads its
//! base state. Different users never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::Mutex as AsyncMutex;

use super::errors::TaskStoreError;
use super::helpers::{assign_missing_ids, find_task, resolve};
use super::types::{Task, TaskCounts, TaskFilter, TaskId, TaskRef};
use crate::shared::errors::StorageError;
use crate::storage::keys::tasks_key;
use crate::storage::KeyValueStore;

pub struct TaskStore<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    backend: Arc<S>,
    cache: RwLock<HashMap<String, Vec<Task>>>,
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<S> Clone for TaskStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                cache: RwLock::new(HashMap::new()),
                locks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Re-syncs the user's list from durable storage.
    ///
    /// A missing record leaves the in-memory state alone. Records stored
    /// without ids get them assigned and written back before installing, so
    /// repeated loads hand out the same ids.
    pub async fn load(&self, user_id: &str) -> Result<(), TaskStoreError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        match self.read_durable(user_id).await? {
            Some(mut tasks) => {
                let assigned = assign_missing_ids(&mut tasks);
                if assigned > 0 {
                    if let Err(e) = self.persist(user_id, &tasks).await {
                        tracing::warn!(
                            target: "tasks",
                            user = user_id,
                            error = %e,
                            "Failed to persist assigned task ids"
                        );
                        return Err(e.into());
                    }
                    tracing::debug!(target: "tasks", user = user_id, assigned, "Assigned missing task ids");
                }
                tracing::debug!(
                    target: "tasks",
                    user = user_id,
                    count = tasks.len(),
                    "Loaded tasks"
                );
                self.install(user_id, tasks);
            }
            None => {
                tracing::debug!(target: "tasks", user = user_id, "No stored tasks");
            }
        }
        Ok(())
    }

    /// Appends `task` to the end of the user's list and returns its id.
    pub async fn add_task(&self, user_id: &str, task: Task) -> Result<TaskId, TaskStoreError> {
        let id = task.id.clone();
        self.mutate(user_id, "add", move |tasks| {
            tasks.push(task);
            Ok(())
        })
        .await?;
        Ok(id)
    }

    /// Flips `completed` and returns the new value.
    pub async fn toggle_completion(
        &self,
        user_id: &str,
        task: impl Into<TaskRef>,
    ) -> Result<bool, TaskStoreError> {
        let task = task.into();
        self.mutate(user_id, "toggle", move |tasks| {
            let index = resolve(tasks, &task)?;
            let entry = &mut tasks[index];
            entry.completed = !entry.completed;
            Ok(entry.completed)
        })
        .await
    }

    /// Replaces the text of one task. Any string is accepted here.
    pub async fn edit_text(
        &self,
        user_id: &str,
        task: impl Into<TaskRef>,
        new_text: impl Into<String>,
    ) -> Result<(), TaskStoreError> {
        let task = task.into();
        let new_text = new_text.into();
        self.mutate(user_id, "edit", move |tasks| {
            let index = resolve(tasks, &task)?;
            tasks[index].text = new_text;
            Ok(())
        })
        .await
    }

    /// Removes one task, shifting later ones down, and returns it.
    pub async fn delete_task(
        &self,
        user_id: &str,
        task: impl Into<TaskRef>,
    ) -> Result<Task, TaskStoreError> {
        let task = task.into();
        self.mutate(user_id, "delete", move |tasks| {
            let index = resolve(tasks, &task)?;
            Ok(tasks.remove(index))
        })
        .await
    }

    /// Snapshot of the cached list; empty for users never loaded or added to.
    pub fn tasks(&self, user_id: &str) -> Vec<Task> {
        self.cached(user_id).unwrap_or_default()
    }

    pub fn task(&self, user_id: &str, task: impl Into<TaskRef>) -> Option<Task> {
        let cache = self.inner.cache.read().unwrap_or_else(PoisonError::into_inner);
        let tasks = cache.get(user_id)?;
        match task.into() {
            TaskRef::Id(id) => find_task(tasks, &id).cloned(),
            TaskRef::Index(index) => tasks.get(index).cloned(),
        }
    }

    pub fn is_loaded(&self, user_id: &str) -> bool {
        self.inner
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(user_id)
    }

    /// Cached tasks matching `filter`, in insertion order.
    pub fn filtered(&self, user_id: &str, filter: TaskFilter) -> Vec<Task> {
        let mut tasks = self.tasks(user_id);
        tasks.retain(|task| filter.matches(task));
        tasks
    }

    pub fn counts(&self, user_id: &str) -> TaskCounts {
        let cache = self.inner.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache
            .get(user_id)
            .map(|tasks| TaskCounts::of(tasks))
            .unwrap_or_default()
    }

    /// Runs `apply` on a copy of the user's list, persists the result and
    /// installs it. Nothing is written or installed when `apply` fails.
    async fn mutate<F, T>(&self, user_id: &str, op: &'static str, apply: F) -> Result<T, TaskStoreError>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<T, TaskStoreError> + Send,
        T: Send,
    {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut tasks = match self.cached(user_id) {
            Some(tasks) => tasks,
            None => self.read_durable(user_id).await?.unwrap_or_default(),
        };
        assign_missing_ids(&mut tasks);

        let output = match apply(&mut tasks) {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(target: "tasks", user = user_id, op, error = %e, "Rejected mutation");
                return Err(e);
            }
        };

        if let Err(e) = self.persist(user_id, &tasks).await {
            tracing::warn!(
                target: "tasks",
                user = user_id,
                op,
                error = %e,
                "Failed to persist tasks, in-memory list unchanged"
            );
            return Err(e.into());
        }

        tracing::debug!(target: "tasks", user = user_id, op, count = tasks.len(), "Persisted tasks");
        self.install(user_id, tasks);
        Ok(output)
    }

    /// One lock per user id ever seen. Entries are never pruned; the map is
    /// bounded by the number of users.
    fn user_lock(&self, user_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.inner.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(user_id.to_string()).or_default())
    }

    fn cached(&self, user_id: &str) -> Option<Vec<Task>> {
        self.inner
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    fn install(&self, user_id: &str, tasks: Vec<Task>) {
        self.inner
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id.to_string(), tasks);
    }

    async fn read_durable(&self, user_id: &str) -> Result<Option<Vec<Task>>, StorageError> {
        let Some(raw) = self.inner.backend.get(&tasks_key(user_id)).await? else {
            return Ok(None);
        };
        let tasks: Vec<Task> = serde_json::from_str(&raw)?;
        Ok(Some(tasks))
    }

    async fn persist(&self, user_id: &str, tasks: &[Task]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(tasks)?;
        self.inner.backend.set(&tasks_key(user_id), &raw).await
    }
}
