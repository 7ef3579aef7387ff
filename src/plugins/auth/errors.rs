use thiserror::Error;

use crate::shared::errors::{StorageError, ValidationError};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    AccountExists,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
