//! # Filesystem-backed key-value store
//!
//! [`FileStore`] keeps one JSON file per key so that a user's task list or a
//! single credential field can be rewritten without touching anything else.
//!
//! ```text
//! <data_dir>/kv/
//! ├── tasks_alice@example.com.json
//! ├── userName_alice@example.com.json
//! └── loggedUserEmail.json
//! ```
//!
//! Characters outside `[A-Za-z0-9._@-]` are written as `%XX` so any user
//! identity maps to a single flat filename. Writes land in a temporary file
//! first and are renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::KeyValueStore;
use crate::shared::errors::StorageError;

#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base.join(format!("{}.json", escape_key(key)))
    }
}

/// Escapes a key into a filename-safe form.
pub fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'@' | b'-' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    // "." and ".." are not usable as file stems on their own
    if out.chars().all(|c| c == '.') {
        out = out.replace('.', "%2E");
    }
    out
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.entry_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.base).await?;

        let path = self.entry_path(key);
        let tmp = self
            .base
            .join(format!(".{}.{}.tmp", escape_key(key), Uuid::new_v4().simple()));

        tokio::fs::write(&tmp, value).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::trace!(
            target: "storage",
            path = %path.display(),
            bytes = value.len(),
            "Wrote entry"
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
