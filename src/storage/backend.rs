//! Low-level whole-document storage backend trait and its error type.
//!
//! The [`StorageBackend`] trait is deliberately dumb: it loads and stores
//! opaque bytes for a single document. Serialization, default values and the
//! load-mutate-save discipline live in
//! [`DocumentStore`](crate::storage::DocumentStore).

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// Errors that can occur while reading or writing a document.
///
/// # Examples
///
/// ```
/// use family_run::storage::StorageError;
///
/// let err = StorageError::Backend {
///     message: "disk full".to_string(),
///     source: None,
/// };
/// assert_eq!(err.to_string(), "backend error: disk full");
/// ```
#[derive(Debug)]
pub enum StorageError {
    /// An I/O or backend-specific failure.
    Backend {
        /// Human-readable description of the failure.
        message: String,
        /// The underlying error, if available. Accessible via
        /// [`std::error::Error::source()`].
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The stored document exists but is not valid for its schema.
    Malformed {
        /// Which document failed to parse.
        document: String,
        /// The parse error.
        source: serde_json::Error,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { message, .. } => write!(f, "backend error: {message}"),
            Self::Malformed { document, source } => {
                write!(f, "malformed document {document}: {source}")
            },
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend {
                source: Some(src), ..
            } => Some(src.as_ref()),
            Self::Malformed { source, .. } => Some(source),
            Self::Backend { source: None, .. } => None,
        }
    }
}

/// Whole-document storage.
///
/// Each backend instance holds exactly one document. Implementations must be
/// `Send + Sync` so a single instance can serve concurrent requests.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Reads the stored bytes, or `None` if the document has never been
    /// written.
    ///
    /// # Errors
    ///
    /// [`StorageError::Backend`] on I/O failures other than absence.
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the stored bytes.
    ///
    /// Readers must observe either the previous or the new document, never
    /// a partial write.
    ///
    /// # Errors
    ///
    /// [`StorageError::Backend`] on I/O failures.
    async fn store(&self, data: &[u8]) -> Result<(), StorageError>;

    /// Short description used in log lines and error messages.
    fn describe(&self) -> String;
}

#[async_trait]
impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        self.as_ref().load().await
    }

    async fn store(&self, data: &[u8]) -> Result<(), StorageError> {
        self.as_ref().store(data).await
    }

    fn describe(&self) -> String {
        self.as_ref().describe()
    }
}
