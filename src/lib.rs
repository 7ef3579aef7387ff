//! taskpad: per-user to-do lists persisted in a local key-value store.
//!
//! The presentation layer opens a [`TaskApp`] once per app session and calls
//! into it; everything durable goes through [`storage::KeyValueStore`].

pub mod app;
pub mod core;
pub mod plugins;
pub mod shared;
pub mod storage;

use std::sync::Arc;

pub use app::{AppError, HomeSummary, TaskApp};

use crate::core::logging::{LoggingError, LoggingGuards};
use crate::core::settings::{AppSettings, StorageBackend};
use crate::plugins::device::{DefaultNotifier, Geolocator};
use crate::shared::errors::StorageError;
use crate::shared::paths::{get_db_path, get_kv_dir, get_log_dir};
use crate::storage::{DefaultStore, FileStore, SqliteStore};

/// Starts file logging under `<data_dir>/logs`.
pub fn start_logging(settings: &AppSettings) -> Result<LoggingGuards, LoggingError> {
    let log_dir = get_log_dir(&settings.data_dir());
    crate::core::logging::init_logging(&log_dir, &settings.log_filter)
}

/// Opens the app on the configured on-disk store below the data directory.
pub fn open<G: Geolocator>(
    settings: &AppSettings,
    locator: G,
) -> Result<TaskApp<DefaultStore, DefaultNotifier, G>, StorageError> {
    let data_dir = settings.data_dir();
    let backend = match settings.storage {
        StorageBackend::Sqlite => {
            let path = get_db_path(&data_dir);
            tracing::info!(target: "system", path = %path.display(), "Opening task database");
            DefaultStore::Sqlite(SqliteStore::open(&path)?)
        }
        StorageBackend::Files => {
            let kv_dir = get_kv_dir(&data_dir);
            tracing::info!(target: "system", path = %kv_dir.display(), "Opening task storage");
            DefaultStore::Files(FileStore::new(kv_dir))
        }
    };

    Ok(TaskApp::new(
        Arc::new(backend),
        DefaultNotifier::from_enabled(settings.notifications_enabled),
        locator,
    ))
}
