//! In-memory storage backend.
//!
//! Holds a single document in a `parking_lot::Mutex`. Used by tests and by
//! callers that want the store semantics without touching disk.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::backend::{StorageBackend, StorageError};

/// Thread-safe in-memory document.
///
/// # Examples
///
/// ```
/// use family_run::storage::memory::InMemoryBackend;
///
/// let backend = InMemoryBackend::new();
/// assert!(backend.contents().is_none());
/// assert_eq!(backend.write_count(), 0);
///
/// let seeded = InMemoryBackend::with_data(b"[]".to_vec());
/// assert_eq!(seeded.contents().as_deref(), Some(&b"[]"[..]));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: Mutex<Option<Vec<u8>>>,
    writes: AtomicU64,
}

impl InMemoryBackend {
    /// Creates an empty backend (the document does not exist yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose document already holds `data`.
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: Mutex::new(Some(data)),
            writes: AtomicU64::new(0),
        }
    }

    /// A copy of the stored bytes.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.data.lock().clone()
    }

    /// Number of successful [`store`](StorageBackend::store) calls.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.lock().clone())
    }

    async fn store(&self, data: &[u8]) -> Result<(), StorageError> {
        *self.data.lock() = Some(data.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
