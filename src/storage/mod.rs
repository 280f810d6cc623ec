//! Whole-document persistence.
//!
//! # Architecture
//!
//! 1. **[`StorageBackend`]** -- loads and stores the raw bytes of one
//!    document. Backends: [`JsonFileBackend`](file::JsonFileBackend) and
//!    [`InMemoryBackend`](memory::InMemoryBackend).
//!
//! 2. **[`DocumentStore<T>`]** -- serializes `T` as 2-space pretty JSON,
//!    substitutes `T::default()` for a missing document, and serializes
//!    load-mutate-save cycles behind an async mutex so concurrent writers in
//!    one process never lose updates.
//!
//! Every read loads the whole document and every write replaces it.

pub mod backend;
pub mod file;
pub mod memory;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error};

pub use backend::{StorageBackend, StorageError};

/// A typed JSON document over a [`StorageBackend`].
///
/// # Examples
///
/// ```
/// use family_run::storage::memory::InMemoryBackend;
/// use family_run::storage::DocumentStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), family_run::storage::StorageError> {
/// let doc: DocumentStore<Vec<u32>> = DocumentStore::new("numbers", InMemoryBackend::new());
/// assert!(doc.load().await?.is_empty());
///
/// let len = doc
///     .update(|numbers| {
///         numbers.push(7);
///         Ok::<_, family_run::storage::StorageError>(numbers.len())
///     })
///     .await?;
/// assert_eq!(len, 1);
/// assert_eq!(doc.load().await?, vec![7]);
/// # Ok(())
/// # }
/// ```
pub struct DocumentStore<T> {
    name: &'static str,
    backend: Arc<dyn StorageBackend>,
    write_lock: Mutex<()>,
    _document: PhantomData<fn() -> T>,
}

impl<T> DocumentStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Creates a store named `name` (used in logs and errors).
    pub fn new(name: &'static str, backend: impl StorageBackend + 'static) -> Self {
        Self::from_arc(name, Arc::new(backend))
    }

    /// Creates a store over an already shared backend.
    pub fn from_arc(name: &'static str, backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            name,
            backend,
            write_lock: Mutex::new(()),
            _document: PhantomData,
        }
    }

    /// The document name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Loads the document, or `T::default()` if it has never been written.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Malformed`] if the stored bytes do not parse as `T`.
    /// - [`StorageError::Backend`] on I/O failures.
    pub async fn load(&self) -> Result<T, StorageError> {
        let Some(bytes) = self.backend.load().await? else {
            debug!(document = self.name, "document absent, using empty default");
            return Ok(T::default());
        };

        serde_json::from_slice(&bytes).map_err(|source| {
            error!(
                document = self.name,
                location = %self.backend.describe(),
                error = %source,
                "stored document does not parse"
            );
            StorageError::Malformed {
                document: format!("{} ({})", self.name, self.backend.describe()),
                source,
            }
        })
    }

    /// Replaces the document with `document`.
    ///
    /// # Errors
    ///
    /// [`StorageError::Backend`] on serialization or I/O failures.
    pub async fn save(&self, document: &T) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.write(document).await
    }

    /// Runs one serialized load-mutate-save cycle.
    ///
    /// `mutate` sees the current document. The document is saved only when
    /// `mutate` returns `Ok`; on `Err` nothing is written.
    ///
    /// # Errors
    ///
    /// Whatever `mutate` returns, or a storage error converted into `E`.
    pub async fn update<R, E, F>(&self, mutate: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
        E: From<StorageError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load().await?;
        let outcome = mutate(&mut document)?;
        self.write(&document).await?;
        Ok(outcome)
    }

    async fn write(&self, document: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|e| StorageError::Backend {
            message: format!("failed to serialize {}", self.name),
            source: Some(Box::new(e)),
        })?;
        self.backend.store(&bytes).await?;
        debug!(document = self.name, bytes = bytes.len(), "document saved");
        Ok(())
    }
}

impl<T> fmt::Debug for DocumentStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("name", &self.name)
            .field("backend", &self.backend.describe())
            .finish()
    }
}
