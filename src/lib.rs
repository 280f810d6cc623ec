//! Household running log with a feedback/task list.
//!
//! Family members log running distances grouped by calendar week. A second,
//! independent document tracks feedback items (feature requests, bugs, tasks)
//! through a small status/priority lifecycle.
//!
//! # Module Organization
//!
//! - [`week`] - [`WeekKey`] derivation, parsing, ordering and display
//! - [`runlog`] - The week-keyed run store and its weekly aggregates
//! - [`feedback`] - Feedback item types and CRUD store
//! - [`storage`] - Whole-document persistence (`StorageBackend`, `DocumentStore`)
//! - [`config`] - TOML-backed tracker configuration
//! - [`clock`] - Injectable time source
//! - [`error`] - [`TrackerError`]
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use family_run::runlog::RunLog;
//! use family_run::storage::memory::InMemoryBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), family_run::TrackerError> {
//! let log = RunLog::new(InMemoryBackend::new(), vec!["Gabor".to_string()]);
//! let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
//!
//! let week = log.add_run("Gabor", 5.2, today).await?;
//! assert_eq!(week.to_string(), "2024-W24");
//!
//! let weeks = log.list_weeks(today).await?;
//! assert_eq!(weeks[0].members["Gabor"].total_km, 5.2);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod feedback;
pub mod runlog;
pub mod storage;
pub mod week;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TrackerConfig;
pub use error::TrackerError;
pub use feedback::{FeedbackItem, FeedbackKind, FeedbackStatus, FeedbackStore, Priority};
pub use runlog::{RunData, RunLog, WeekSummary};
pub use week::WeekKey;
