use std::sync::Arc;

use crate::shared::errors::StorageError;
use crate::storage::keys::SESSION_KEY;
use crate::storage::KeyValueStore;

/// Remembers which user is logged in across restarts.
pub struct Session<S> {
    backend: Arc<S>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self { backend }
    }

    pub async fn start(&self, user_id: &str) -> Result<(), StorageError> {
        self.backend.set(SESSION_KEY, user_id).await
    }

    pub async fn current(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .backend
            .get(SESSION_KEY)
            .await?
            .filter(|user| !user.is_empty()))
    }

    pub async fn end(&self) -> Result<(), StorageError> {
        self.backend.remove(SESSION_KEY).await
    }
}
