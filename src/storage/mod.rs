//! Durable key-value storage.
//!
//! Everything the app persists goes through [`KeyValueStore`]: task lists,
//! credential records and the remembered session. Keys are namespaced per
//! user identity, see [`keys`].

pub mod file;
pub mod keys;
pub mod memory;
pub mod sqlite;

use crate::shared::errors::StorageError;
use std::future::Future;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Async string-to-string store used as the source of truth across restarts.
///
/// Implementations own their own timeout behavior; callers never retry.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns `None` when the key has never been written (or was removed).
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// The on-disk backend picked from settings at startup.
#[derive(Clone)]
pub enum DefaultStore {
    Sqlite(SqliteStore),
    Files(FileStore),
}

impl KeyValueStore for DefaultStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            DefaultStore::Sqlite(store) => store.get(key).await,
            DefaultStore::Files(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            DefaultStore::Sqlite(store) => store.set(key, value).await,
            DefaultStore::Files(store) => store.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            DefaultStore::Sqlite(store) => store.remove(key).await,
            DefaultStore::Files(store) => store.remove(key).await,
        }
    }
}
