use std::path::{Path, PathBuf};

const APP_DIR: &str = "taskpad";

/// Get the base storage directory.
/// Returns `$XDG_DATA_HOME/taskpad`, the platform data dir, or `./taskpad`.
pub fn get_storage_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        if !xdg_data.is_empty() {
            return PathBuf::from(xdg_data).join(APP_DIR);
        }
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Get the logs directory path below `base`.
pub fn get_log_dir(base: &Path) -> PathBuf {
    base.join("logs")
}

/// Get the key-value directory path below `base`.
pub fn get_kv_dir(base: &Path) -> PathBuf {
    base.join("kv")
}

/// Get the SQLite database path below `base`.
pub fn get_db_path(base: &Path) -> PathBuf {
    base.join("taskpad.db")
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_dir_structure() {
        let storage = get_storage_dir();
        assert!(storage.ends_with("taskpad"));

        let logs = get_log_dir(&storage);
        assert!(logs.ends_with("logs"));

        let kv = get_kv_dir(&storage);
        assert!(kv.ends_with("kv"));

        assert_eq!(get_db_path(&storage).file_name().unwrap(), "taskpad.db");
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Second call is a no-op
        ensure_dir(&nested).unwrap();
    }
}
