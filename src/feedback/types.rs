//! Feedback item types.
//!
//! Enumerations serialize in kebab-case (`in-progress`) and parse from the
//! same strings via [`FromStr`], returning
//! [`TrackerError::InvalidField`] for anything else.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TrackerError;

/// Prefix shared by all feedback identifiers.
pub const ID_PREFIX: &str = "task-";

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// All values, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire spelling.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TrackerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $wire => Ok(Self::$variant), )+
                    other => Err(TrackerError::InvalidField {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// What kind of request an item is.
    FeedbackKind, "type" {
        /// A new capability (default).
        #[default]
        Feature => "feature",
        /// Something broken.
        Bug => "bug",
        /// A change to existing behavior.
        Improvement => "improvement",
        /// Chores and other work.
        Task => "task",
    }
}

wire_enum! {
    /// Where an item is in its lifecycle.
    FeedbackStatus, "status" {
        /// Newly created (default).
        #[default]
        Open => "open",
        /// Being worked on.
        InProgress => "in-progress",
        /// Done, awaiting confirmation.
        Resolved => "resolved",
        /// Finished or dismissed.
        Closed => "closed",
    }
}

wire_enum! {
    /// How urgent an item is.
    Priority, "priority" {
        /// Whenever there is time.
        Low => "low",
        /// Normal (default).
        #[default]
        Medium => "medium",
        /// Soon.
        High => "high",
    }
}

/// A tracked feedback/task record.
///
/// # Examples
///
/// ```
/// use family_run::{FeedbackItem, FeedbackStatus, Priority};
///
/// let json = r#"{
///     "id": "task-20240610083000-1a2b3c4d",
///     "type": "bug",
///     "status": "in-progress",
///     "priority": "high",
///     "title": "Fix header",
///     "description": "",
///     "created_at": "2024-06-10T08:30:00Z"
/// }"#;
/// let item: FeedbackItem = serde_json::from_str(json).unwrap();
/// assert_eq!(item.status, FeedbackStatus::InProgress);
/// assert_eq!(item.priority, Priority::High);
/// assert!(item.updated_at.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    /// Unique identifier, always starting with `task-`.
    pub id: String,
    /// Kind of request.
    #[serde(rename = "type", default)]
    pub kind: FeedbackKind,
    /// Lifecycle status.
    #[serde(default)]
    pub status: FeedbackStatus,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Short summary. Never blank.
    pub title: String,
    /// Free-form details.
    #[serde(default)]
    pub description: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last update; absent until the first one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields of a new item. Unset kind and priority take their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewFeedback {
    /// Kind, defaulting to [`FeedbackKind::Feature`].
    pub kind: Option<FeedbackKind>,
    /// Priority, defaulting to [`Priority::Medium`].
    pub priority: Option<Priority>,
    /// Required title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
}

impl NewFeedback {
    /// A new item with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A partial update: only the fields that are `Some` change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackUpdate {
    /// New status.
    pub status: Option<FeedbackStatus>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New title. Must not be blank.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl FeedbackUpdate {
    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.title.is_none()
            && self.description.is_none()
    }
}

/// Trims `title`, rejecting blank titles.
pub(crate) fn normalize_title(title: &str) -> Result<String, TrackerError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(TrackerError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Generates `task-{YYYYMMDDHHMMSS}-{8 hex}`.
///
/// The random suffix keeps same-second creations apart; the store still
/// checks for collisions before inserting.
pub fn generate_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{ID_PREFIX}{}-{}", now.format("%Y%m%d%H%M%S"), &suffix[..8])
}
