//! Screen-level flows on top of the stores.
//!
//! [`TaskApp`] is what the presentation layer holds for the lifetime of a
//! session. Every call names the user explicitly; the only remembered state is
//! the logged-in identity kept by [`Session`].

use std::sync::Arc;

use argon2::Params;
use serde::Serialize;
use thiserror::Error;

use crate::plugins::auth::{AuthError, Accounts, Session, SignUp, UserProfile};
use crate::plugins::device::location::{Geolocator, Permission};
use crate::plugins::device::notification::{task_created, Notifier};
use crate::plugins::tasks::types::{Location, NewTask, Task, TaskCounts, TaskFilter, TaskId, TaskRef};
use crate::plugins::tasks::{TaskStore, TaskStoreError};
use crate::shared::errors::{StorageError, ValidationError};
use crate::storage::KeyValueStore;

/// Top-level error type for app flows.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Tasks(#[from] TaskStoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Data for the home screen greeting and cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSummary {
    pub display_name: String,
    pub counts: TaskCounts,
}

pub struct TaskApp<S, N, G> {
    tasks: TaskStore<S>,
    accounts: Accounts<S>,
    session: Session<S>,
    backend: Arc<S>,
    notifier: N,
    locator: G,
}

impl<S, N, G> TaskApp<S, N, G>
where
    S: KeyValueStore,
    N: Notifier,
    G: Geolocator,
{
    pub fn new(backend: Arc<S>, notifier: N, locator: G) -> Self {
        Self {
            tasks: TaskStore::new(Arc::clone(&backend)),
            accounts: Accounts::new(Arc::clone(&backend)),
            session: Session::new(Arc::clone(&backend)),
            backend,
            notifier,
            locator,
        }
    }

    /// Replaces the Argon2id costs used for new accounts.
    pub fn with_hash_params(mut self, params: Params) -> Self {
        self.accounts = Accounts::with_hash_params(Arc::clone(&self.backend), params);
        self
    }

    pub fn tasks(&self) -> &TaskStore<S> {
        &self.tasks
    }

    pub fn accounts(&self) -> &Accounts<S> {
        &self.accounts
    }

    pub async fn sign_up(&self, form: SignUp) -> Result<UserProfile, AppError> {
        Ok(self.accounts.sign_up(form).await?)
    }

    /// Verifies credentials, loads the user's tasks and remembers the user.
    ///
    /// The session is only started once the tasks loaded.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        let profile = self.accounts.log_in(email, password).await?;
        self.tasks.load(&profile.user_id).await?;
        self.session.start(&profile.user_id).await?;
        Ok(profile)
    }

    pub async fn log_out(&self) -> Result<(), AppError> {
        if let Some(user) = self.session.current().await? {
            tracing::info!(target: "auth", user = %user, "Logged out");
        }
        self.session.end().await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<Option<String>, AppError> {
        Ok(self.session.current().await?)
    }

    /// Picks up a remembered login after a restart and loads that user's tasks.
    pub async fn restore_session(&self) -> Result<Option<String>, AppError> {
        let Some(user) = self.session.current().await? else {
            return Ok(None);
        };
        self.tasks.load(&user).await?;
        tracing::info!(target: "auth", user = %user, "Session restored");
        Ok(Some(user))
    }

    pub async fn home(&self, user_id: &str) -> Result<HomeSummary, AppError> {
        if !self.tasks.is_loaded(user_id) {
            self.tasks.load(user_id).await?;
        }
        let display_name = self
            .accounts
            .display_name(user_id)
            .await?
            .unwrap_or_default();

        Ok(HomeSummary {
            display_name,
            counts: self.tasks.counts(user_id),
        })
    }

    /// Validates the form, stores the task and announces it.
    pub async fn create_task(&self, user_id: &str, form: NewTask) -> Result<TaskId, AppError> {
        form.validate()?;

        let task = form.into_task();
        let (title, body) = task_created(&task.text);
        let id = self.tasks.add_task(user_id, task).await?;

        self.notifier.notify(title, &body);
        Ok(id)
    }

    pub fn list(&self, user_id: &str, filter: TaskFilter) -> Vec<Task> {
        self.tasks.filtered(user_id, filter)
    }

    pub async fn toggle(&self, user_id: &str, task: impl Into<TaskRef>) -> Result<bool, AppError> {
        Ok(self.tasks.toggle_completion(user_id, task).await?)
    }

    /// Blank text is rejected before reaching the store.
    pub async fn edit(
        &self,
        user_id: &str,
        task: impl Into<TaskRef>,
        new_text: &str,
    ) -> Result<(), AppError> {
        if new_text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        Ok(self.tasks.edit_text(user_id, task, new_text).await?)
    }

    pub async fn delete(&self, user_id: &str, task: impl Into<TaskRef>) -> Result<Task, AppError> {
        Ok(self.tasks.delete_task(user_id, task).await?)
    }

    /// Current device position for centering the map, if the user allows it.
    pub async fn locate_user(&self) -> Option<Location> {
        if self.locator.request_permission().await == Permission::Denied {
            tracing::warn!(target: "system", "Location permission denied");
            return None;
        }

        match self.locator.current_position().await {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::warn!(target: "system", error = %e, "Could not get current position");
                None
            }
        }
    }
}
