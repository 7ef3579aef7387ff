use crate::shared::paths::{ensure_dir, get_storage_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which on-disk key-value backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageBackend {
    /// `<data_dir>/taskpad.db`
    #[default]
    Sqlite,
    /// One JSON file per key under `<data_dir>/kv/`
    Files,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub notifications_enabled: bool,
    pub storage: StorageBackend,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_filter: "info".to_string(),
            notifications_enabled: true,
            storage: StorageBackend::default(),
        }
    }
}

impl AppSettings {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(get_storage_dir)
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub fn get_settings_path() -> PathBuf {
    get_storage_dir().join("settings.json")
}

/// Loads settings from the default location, falling back to defaults.
pub fn load_settings() -> AppSettings {
    load_settings_or_default(&get_settings_path())
}

pub fn load_settings_or_default(path: &Path) -> AppSettings {
    if !path.exists() {
        return AppSettings::default();
    }

    match load_settings_from_file(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(target: "system", path = %path.display(), error = %e, "Ignoring unreadable settings");
            AppSettings::default()
        }
    }
}

pub fn load_settings_from_file(path: &Path) -> Result<AppSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&contents)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_or_default(&dir.path().join("settings.json"));

        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.log_filter, "info");
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            data_dir: Some(dir.path().join("data")),
            log_filter: "debug".to_string(),
            notifications_enabled: false,
            storage: StorageBackend::Files,
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings_from_file(&path).unwrap(), settings);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"notificationsEnabled\": false"));
        assert!(raw.contains("\"logFilter\": \"debug\""));
        assert!(raw.contains("\"storage\": \"files\""));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "logFilter": "warn" }"#).unwrap();

        let settings = load_settings_or_default(&path);
        assert_eq!(settings.log_filter, "warn");
        assert!(settings.notifications_enabled);
        assert!(settings.data_dir.is_none());
        assert_eq!(settings.storage, StorageBackend::Sqlite);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            load_settings_from_file(&path),
            Err(SettingsError::ParseError(_))
        ));
        assert_eq!(load_settings_or_default(&path), AppSettings::default());
    }

    #[test]
    fn test_data_dir_override() {
        let settings = AppSettings {
            data_dir: Some(PathBuf::from("/tmp/elsewhere")),
            ..AppSettings::default()
        };
        assert_eq!(settings.data_dir(), PathBuf::from("/tmp/elsewhere"));
        assert!(AppSettings::default().data_dir().ends_with("taskpad"));
    }
}
