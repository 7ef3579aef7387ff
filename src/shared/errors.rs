use thiserror::Error;

/// Failures of the durable key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        StorageError::Unavailable(msg.into())
    }
}

/// Caller-side input checks. The task store itself trusts its inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task text cannot be empty")]
    EmptyText,

    #[error("Task tag cannot be empty")]
    EmptyTag,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Passwords do not match")]
    PasswordMismatch,
}
