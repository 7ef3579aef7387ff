use thiserror::Error;

use super::types::TaskId;
use crate::shared::errors::StorageError;

#[derive(Error, Debug)]
pub enum TaskStoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Task index {index} is out of range (list has {len} tasks)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),
}

impl TaskStoreError {
    /// True when the durable store failed, as opposed to a stale reference from the caller.
    pub fn is_storage(&self) -> bool {
        matches!(self, TaskStoreError::Storage(_))
    }
}
