//! Persisted run data and the weekly views derived from it.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::TrackerError;
use crate::week::WeekKey;

/// Runs logged in one week, keyed by member name.
///
/// Entries keep insertion order. Members that are no longer configured may
/// still appear here; they are preserved on save and skipped by the views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekRecord {
    runs: IndexMap<String, Vec<f64>>,
}

impl WeekRecord {
    /// A week with every member initialized to no runs.
    pub fn for_members(members: &[String]) -> Self {
        Self {
            runs: members.iter().map(|m| (m.clone(), Vec::new())).collect(),
        }
    }

    /// Runs logged by `member`, oldest first. Empty if none.
    pub fn runs(&self, member: &str) -> &[f64] {
        self.runs
            .get(member)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Sum of the member's runs.
    pub fn total_km(&self, member: &str) -> f64 {
        self.runs(member).iter().sum()
    }

    /// Names present in this record, including unconfigured ones.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.runs.keys().map(String::as_str)
    }

    fn push(&mut self, member: &str, km: f64) {
        self.runs.entry(member.to_string()).or_default().push(km);
    }
}

/// The whole run store: week key to [`WeekRecord`].
///
/// Serializes as a JSON object keyed by the week key string:
///
/// ```
/// use family_run::RunData;
///
/// let data: RunData = serde_json::from_str(r#"{"2024-W24": {"Gabor": [5.2]}}"#).unwrap();
/// let week = data.get(&"2024-W24".parse().unwrap()).unwrap();
/// assert_eq!(week.runs("Gabor"), &[5.2]);
/// ```
///
/// Two keys naming the same week (`2024-W9` and `2024-W09`) are rejected
/// rather than merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RunData {
    weeks: BTreeMap<WeekKey, WeekRecord>,
}

impl<'de> Deserialize<'de> for RunData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WeeksVisitor;

        impl<'de> Visitor<'de> for WeeksVisitor {
            type Value = RunData;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of week keys to run records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RunData, A::Error> {
                let mut weeks = BTreeMap::new();
                while let Some((week, record)) = map.next_entry::<WeekKey, WeekRecord>()? {
                    if weeks.insert(week, record).is_some() {
                        return Err(de::Error::custom(format!("duplicate week {week}")));
                    }
                }
                Ok(RunData { weeks })
            }
        }

        deserializer.deserialize_map(WeeksVisitor)
    }
}

impl RunData {
    /// The record for `week`, if any run was logged in it.
    pub fn get(&self, week: &WeekKey) -> Option<&WeekRecord> {
        self.weeks.get(week)
    }

    /// Number of weeks present.
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    /// Returns `true` if no week is present.
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Weeks newest first.
    pub fn weeks_newest_first(&self) -> impl Iterator<Item = (&WeekKey, &WeekRecord)> {
        self.weeks.iter().rev()
    }

    /// Appends a run. A new week starts with every member in `members`
    /// initialized to no runs.
    pub fn record_run(&mut self, week: WeekKey, members: &[String], member: &str, km: f64) {
        self.weeks
            .entry(week)
            .or_insert_with(|| WeekRecord::for_members(members))
            .push(member, km);
    }
}

/// One member's runs within a week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberWeek {
    /// Distances in submission order.
    pub runs: Vec<f64>,
    /// Sum of `runs`.
    pub total_km: f64,
    /// `total_km > 0`.
    pub has_run: bool,
}

impl MemberWeek {
    fn from_runs(runs: &[f64]) -> Self {
        let total_km: f64 = runs.iter().sum();
        Self {
            runs: runs.to_vec(),
            total_km,
            has_run: total_km > 0.0,
        }
    }
}

/// A week annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekSummary {
    /// The week key.
    pub week: WeekKey,
    /// Human readable span.
    pub week_display: String,
    /// Whether this is the week containing "today".
    pub is_current: bool,
    /// Per configured member, in configured order.
    pub members: IndexMap<String, MemberWeek>,
}

impl WeekSummary {
    pub(crate) fn new(
        week: WeekKey,
        record: &WeekRecord,
        members: &[String],
        current: &WeekKey,
    ) -> Self {
        Self {
            week,
            week_display: week.display_range(),
            is_current: week == *current,
            members: members
                .iter()
                .map(|m| (m.clone(), MemberWeek::from_runs(record.runs(m))))
                .collect(),
        }
    }
}

/// Payload of the dashboard: all weeks plus the current week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOverview {
    /// Weeks newest first.
    pub weeks: Vec<WeekSummary>,
    /// Key of the current week.
    pub current_week: WeekKey,
    /// Display span of the current week.
    pub current_week_display: String,
}

/// Interprets a submitted distance.
///
/// Accepts a JSON number or a string holding a number (`"5.2"`). The result
/// is finite but not yet checked for positivity.
///
/// # Errors
///
/// [`TrackerError::InvalidDistance`] for anything else, including `null`,
/// blank strings and non-finite values such as `"inf"`.
///
/// # Examples
///
/// ```
/// use family_run::runlog::parse_distance;
/// use serde_json::json;
///
/// assert_eq!(parse_distance(&json!(5.2)).unwrap(), 5.2);
/// assert_eq!(parse_distance(&json!(" 3 ")).unwrap(), 3.0);
/// assert!(parse_distance(&json!("far")).is_err());
/// assert!(parse_distance(&json!(null)).is_err());
/// ```
pub fn parse_distance(value: &Value) -> Result<f64, TrackerError> {
    let invalid = || TrackerError::InvalidDistance {
        value: value.to_string(),
    };

    let km = match value {
        Value::Number(n) => n.as_f64().ok_or_else(invalid)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if km.is_finite() {
        Ok(km)
    } else {
        Err(invalid())
    }
}

/// Checks that a distance is a finite, strictly positive number.
pub fn validate_distance(km: f64) -> Result<f64, TrackerError> {
    if !km.is_finite() {
        return Err(TrackerError::InvalidDistance {
            value: km.to_string(),
        });
    }
    if km <= 0.0 {
        return Err(TrackerError::NonPositiveDistance { km });
    }
    Ok(km)
}
