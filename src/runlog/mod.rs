//! The week-keyed run store.
//!
//! [`RunLog`] owns the run document and the configured member list. It
//! validates submissions, appends runs to the current week and builds the
//! weekly summaries shown on the dashboard.

mod record;

use chrono::NaiveDate;
use tracing::{info, warn};

pub use record::{
    parse_distance, validate_distance, MemberWeek, RunData, RunOverview, WeekRecord, WeekSummary,
};

use crate::error::TrackerError;
use crate::storage::{DocumentStore, StorageBackend};
use crate::week::WeekKey;

/// Run log over one [`StorageBackend`].
#[derive(Debug)]
pub struct RunLog {
    document: DocumentStore<RunData>,
    members: Vec<String>,
}

impl RunLog {
    /// Creates a run log for the given known members.
    pub fn new(backend: impl StorageBackend + 'static, members: Vec<String>) -> Self {
        Self {
            document: DocumentStore::new("runs", backend),
            members,
        }
    }

    /// The known members, in display order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Fails with [`TrackerError::UnknownMember`] unless `member` is known.
    pub fn check_member(&self, member: &str) -> Result<(), TrackerError> {
        if self.members.iter().any(|m| m == member) {
            Ok(())
        } else {
            warn!(member, "rejected run for unknown member");
            Err(TrackerError::UnknownMember {
                member: member.to_string(),
            })
        }
    }

    /// Loads the whole store. Empty if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// [`TrackerError::Storage`] if the document cannot be read or parsed.
    pub async fn load(&self) -> Result<RunData, TrackerError> {
        Ok(self.document.load().await?)
    }

    /// Replaces the whole store.
    pub async fn save(&self, data: &RunData) -> Result<(), TrackerError> {
        Ok(self.document.save(data).await?)
    }

    /// All weeks, newest first, summarized for the known members.
    pub async fn list_weeks(&self, today: NaiveDate) -> Result<Vec<WeekSummary>, TrackerError> {
        let data = self.load().await?;
        let current = WeekKey::from_date(today);
        Ok(data
            .weeks_newest_first()
            .map(|(week, record)| WeekSummary::new(*week, record, &self.members, &current))
            .collect())
    }

    /// Dashboard payload: [`list_weeks`](Self::list_weeks) plus the current
    /// week and its display span.
    pub async fn overview(&self, today: NaiveDate) -> Result<RunOverview, TrackerError> {
        let weeks = self.list_weeks(today).await?;
        let current_week = WeekKey::from_date(today);
        Ok(RunOverview {
            weeks,
            current_week,
            current_week_display: current_week.display_range(),
        })
    }

    /// Appends `km` to `member`'s runs for the week containing `today`.
    ///
    /// The member is checked before the distance. Rejected submissions never
    /// touch the store.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::UnknownMember`] if `member` is not configured.
    /// - [`TrackerError::InvalidDistance`] if `km` is not finite.
    /// - [`TrackerError::NonPositiveDistance`] if `km <= 0`.
    /// - [`TrackerError::Storage`] if the store cannot be read or written.
    pub async fn add_run(
        &self,
        member: &str,
        km: f64,
        today: NaiveDate,
    ) -> Result<WeekKey, TrackerError> {
        self.check_member(member)?;
        let km = validate_distance(km)
            .inspect_err(|e| warn!(member, km, error = %e, "rejected run"))?;

        let week = WeekKey::from_date(today);
        self.document
            .update(|data| {
                data.record_run(week, &self.members, member, km);
                Ok::<_, TrackerError>(())
            })
            .await?;

        info!(member, km, week = %week, "run recorded");
        Ok(week)
    }
}
