//! JSON file backend.
//!
//! Writes go to a temporary file in the target's directory which is synced
//! and then renamed over the target, so a crash mid-write leaves the previous
//! document intact.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use super::backend::{StorageBackend, StorageError};

/// Stores one document in one file.
///
/// # Examples
///
/// ```
/// use family_run::storage::file::JsonFileBackend;
///
/// let backend = JsonFileBackend::new("data/data.json");
/// assert_eq!(backend.path().to_str(), Some("data/data.json"));
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Creates a backend for `path`. Nothing is touched on disk until the
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The document's file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &self.path, e)),
        }
    }

    async fn store(&self, data: &[u8]) -> Result<(), StorageError> {
        let path = self.path.clone();
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || write_atomic(&path, &data))
            .await
            .map_err(|e| StorageError::Backend {
                message: format!("write task for {} did not complete", self.path.display()),
                source: Some(Box::new(e)),
            })?
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| io_error("create directory", &dir, e))?;

    let mut tmp =
        NamedTempFile::new_in(&dir).map_err(|e| io_error("create temp file in", &dir, e))?;
    tmp.write_all(data)
        .map_err(|e| io_error("write temp file for", path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| io_error("sync temp file for", path, e))?;
    tmp.persist(path)
        .map_err(|e| io_error("replace", path, e.error))?;

    Ok(())
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Backend {
        message: format!("failed to {action} {}: {err}", path.display()),
        source: Some(Box::new(err)),
    }
}
