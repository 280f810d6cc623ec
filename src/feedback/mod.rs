//! Feedback/task list.
//!
//! [`FeedbackStore`] keeps an ordered list of [`FeedbackItem`]s in one JSON
//! document. Items are appended on creation, so list order is creation order.

mod types;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

pub use types::{
    generate_id, FeedbackItem, FeedbackKind, FeedbackStatus, FeedbackUpdate, NewFeedback,
    Priority, ID_PREFIX,
};

use crate::error::TrackerError;
use crate::storage::{DocumentStore, StorageBackend};
use types::normalize_title;

/// CRUD over the feedback list.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use family_run::feedback::{FeedbackKind, FeedbackStatus, FeedbackStore, NewFeedback, Priority};
/// use family_run::storage::memory::InMemoryBackend;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), family_run::TrackerError> {
/// let store = FeedbackStore::new(InMemoryBackend::new());
/// let item = store
///     .create(
///         NewFeedback {
///             kind: Some(FeedbackKind::Bug),
///             ..NewFeedback::titled("Fix header")
///         },
///         Utc::now(),
///     )
///     .await?;
///
/// assert_eq!(item.status, FeedbackStatus::Open);
/// assert_eq!(item.priority, Priority::Medium);
/// assert!(item.id.starts_with("task-"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FeedbackStore {
    document: DocumentStore<Vec<FeedbackItem>>,
}

impl FeedbackStore {
    /// Creates a store over `backend`.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            document: DocumentStore::new("feedback", backend),
        }
    }

    /// All items in creation order. Empty if nothing was ever saved.
    pub async fn list(&self) -> Result<Vec<FeedbackItem>, TrackerError> {
        Ok(self.document.load().await?)
    }

    /// The item with `id`.
    ///
    /// # Errors
    ///
    /// [`TrackerError::NotFound`] if no item has that id.
    pub async fn get(&self, id: &str) -> Result<FeedbackItem, TrackerError> {
        self.list()
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or_else(|| TrackerError::NotFound { id: id.to_string() })
    }

    /// Appends a new open item.
    ///
    /// # Errors
    ///
    /// [`TrackerError::EmptyTitle`] if the title is blank; the store is not
    /// touched in that case.
    pub async fn create(
        &self,
        new: NewFeedback,
        now: DateTime<Utc>,
    ) -> Result<FeedbackItem, TrackerError> {
        let title = normalize_title(&new.title)
            .inspect_err(|_| warn!("rejected feedback without title"))?;

        let item = self
            .document
            .update(|items| {
                let mut id = generate_id(now);
                while items.iter().any(|existing| existing.id == id) {
                    id = generate_id(now);
                }

                let item = FeedbackItem {
                    id,
                    kind: new.kind.unwrap_or_default(),
                    status: FeedbackStatus::Open,
                    priority: new.priority.unwrap_or_default(),
                    title,
                    description: new.description.unwrap_or_default(),
                    created_at: now,
                    updated_at: None,
                };
                items.push(item.clone());
                Ok::<_, TrackerError>(item)
            })
            .await?;

        info!(id = %item.id, kind = %item.kind, priority = %item.priority, "feedback created");
        Ok(item)
    }

    /// Applies the fields set in `changes` and stamps `updated_at`.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::NotFound`] if no item has `id`, whatever `changes`
    ///   holds.
    /// - [`TrackerError::EmptyTitle`] if `changes` sets a blank title.
    pub async fn update(
        &self,
        id: &str,
        changes: FeedbackUpdate,
        now: DateTime<Utc>,
    ) -> Result<FeedbackItem, TrackerError> {
        let item = self
            .document
            .update(|items| {
                let item = items
                    .iter_mut()
                    .find(|item| item.id == id)
                    .ok_or_else(|| TrackerError::NotFound { id: id.to_string() })?;
                let title = changes.title.as_deref().map(normalize_title).transpose()?;

                if let Some(status) = changes.status {
                    item.status = status;
                }
                if let Some(priority) = changes.priority {
                    item.priority = priority;
                }
                if let Some(title) = title {
                    item.title = title;
                }
                if let Some(description) = changes.description {
                    item.description = description;
                }
                item.updated_at = Some(now);

                Ok::<_, TrackerError>(item.clone())
            })
            .await?;

        info!(id, status = %item.status, "feedback updated");
        Ok(item)
    }

    /// Removes the item with `id`.
    ///
    /// # Errors
    ///
    /// [`TrackerError::NotFound`] if nothing was removed; the store is not
    /// rewritten in that case.
    pub async fn delete(&self, id: &str) -> Result<(), TrackerError> {
        self.document
            .update(|items| {
                let before = items.len();
                items.retain(|item| item.id != id);
                if items.len() == before {
                    Err(TrackerError::NotFound { id: id.to_string() })
                } else {
                    Ok(())
                }
            })
            .await?;

        info!(id, "feedback deleted");
        Ok(())
    }
}
