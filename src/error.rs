//! Error types for tracker operations.
//!
//! [`TrackerError`] separates caller mistakes (validation), missing records
//! and storage failures so the HTTP layer can map each kind to a status code
//! without inspecting messages.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by the run log and feedback stores.
///
/// # Examples
///
/// ```
/// use family_run::TrackerError;
///
/// let err = TrackerError::UnknownMember { member: "Zoltan".to_string() };
/// assert!(err.is_validation());
/// assert_eq!(err.to_string(), "Invalid family member");
///
/// let err = TrackerError::NotFound { id: "task-1".to_string() };
/// assert!(!err.is_validation());
/// ```
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The member is not part of the configured family.
    #[error("Invalid family member")]
    UnknownMember {
        /// The rejected member name.
        member: String,
    },

    /// The distance is not a finite number.
    #[error("Invalid distance")]
    InvalidDistance {
        /// The rejected input, rendered as text.
        value: String,
    },

    /// The distance parsed but is zero or negative.
    #[error("Distance must be positive")]
    NonPositiveDistance {
        /// The rejected distance.
        km: f64,
    },

    /// A feedback title is missing or blank.
    #[error("Title is required")]
    EmptyTitle,

    /// An enumerated field carried a value outside its allowed set.
    #[error("Invalid {field}: '{value}'")]
    InvalidField {
        /// The field name as it appears on the wire.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A week key is malformed or its week number does not exist in its year.
    #[error("Invalid week key '{key}': {reason}")]
    InvalidWeekKey {
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No feedback item has the given identifier.
    #[error("Item not found: {id}")]
    NotFound {
        /// The identifier that matched nothing.
        id: String,
    },

    /// The backing document could not be read, parsed or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TrackerError {
    /// Returns `true` for errors caused by bad caller input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownMember { .. }
                | Self::InvalidDistance { .. }
                | Self::NonPositiveDistance { .. }
                | Self::EmptyTitle
                | Self::InvalidField { .. }
                | Self::InvalidWeekKey { .. }
        )
    }

    /// Returns `true` if the error is [`TrackerError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_api_contract() {
        assert_eq!(
            TrackerError::UnknownMember {
                member: "x".to_string()
            }
            .to_string(),
            "Invalid family member"
        );
        assert_eq!(
            TrackerError::InvalidDistance {
                value: "abc".to_string()
            }
            .to_string(),
            "Invalid distance"
        );
        assert_eq!(
            TrackerError::NonPositiveDistance { km: -1.0 }.to_string(),
            "Distance must be positive"
        );
        assert_eq!(TrackerError::EmptyTitle.to_string(), "Title is required");
    }

    #[test]
    fn classification() {
        assert!(TrackerError::EmptyTitle.is_validation());
        assert!(TrackerError::InvalidField {
            field: "priority",
            value: "urgent".to_string()
        }
        .is_validation());
        assert!(TrackerError::NotFound {
            id: "task-x".to_string()
        }
        .is_not_found());

        let storage = TrackerError::from(StorageError::Backend {
            message: "disk full".to_string(),
            source: None,
        });
        assert!(!storage.is_validation());
        assert!(!storage.is_not_found());
        assert_eq!(storage.to_string(), "backend error: disk full");
    }
}
