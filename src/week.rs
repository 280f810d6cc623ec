//! Calendar week keys.
//!
//! A [`WeekKey`] names a Monday-to-Sunday week as `YYYY-Www`. Numbering is
//! week-of-year with Monday as the first day (the `%W` convention): week 1
//! starts on the first Monday of the year and the days before it fall in
//! week 0. This is not ISO-8601 numbering. The same convention drives both
//! key derivation and the displayed date range, so a date always lands in
//! the span its key displays.
//!
//! Keys compare as `(year, week)` integers, so `2024-W9` sorts before
//! `2024-W10`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TrackerError;

/// Highest week number the `%W` convention can produce.
pub const MAX_WEEK: u32 = 53;

/// Identifier of one calendar week within a year.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use family_run::WeekKey;
///
/// let key = WeekKey::from_date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
/// assert_eq!(key.to_string(), "2024-W24");
/// assert_eq!(key.display_range(), "Jun 10 - Jun 16, 2024");
///
/// let parsed: WeekKey = "2024-W9".parse().unwrap();
/// assert!(parsed < "2024-W10".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    year: i32,
    week: u32,
    start: NaiveDate,
}

impl WeekKey {
    /// Builds a key, rejecting week numbers that do not exist in `year`.
    ///
    /// A week exists when its Monday-to-Sunday span contains at least one
    /// day of `year`: week 0 is absent from years that begin on a Monday,
    /// and week 53 only exists in some years.
    pub fn new(year: i32, week: u32) -> Result<Self, TrackerError> {
        let invalid = |reason: String| TrackerError::InvalidWeekKey {
            key: format!("{year:04}-W{week:02}"),
            reason,
        };

        if week > MAX_WEEK {
            return Err(invalid(format!(
                "week number must be between 0 and {MAX_WEEK}"
            )));
        }

        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| invalid("year is out of range".to_string()))?;
        let first_monday = jan1
            .checked_add_days(Days::new(days_until_monday(jan1)))
            .ok_or_else(|| invalid("year is out of range".to_string()))?;

        let start = if week == 0 {
            if first_monday == jan1 {
                return Err(invalid(format!("{year} starts on a Monday and has no week 0")));
            }
            first_monday.checked_sub_days(Days::new(7))
        } else {
            first_monday.checked_add_days(Days::new(7 * u64::from(week - 1)))
        }
        .ok_or_else(|| invalid("year is out of range".to_string()))?;

        if start.year() > year {
            return Err(invalid(format!("{year} has no week {week}")));
        }

        Ok(Self { year, week, start })
    }

    /// Derives the key of the week containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        let jan1_weekday = (date.weekday().num_days_from_monday() + 7 - date.ordinal0() % 7) % 7;
        let first_monday_ordinal0 = (7 - jan1_weekday) % 7;
        let week = (date.ordinal0() + 7 - first_monday_ordinal0) / 7;

        Self {
            year: date.year(),
            week,
            start: date.week(Weekday::Mon).first_day(),
        }
    }

    /// Derives the key of the current week in the timezone of `now`.
    pub fn current<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::from_date(now.date_naive())
    }

    /// The year part of the key.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The week number part of the key (0..=53).
    pub fn week(&self) -> u32 {
        self.week
    }

    /// Monday of the week.
    pub fn first_day(&self) -> NaiveDate {
        self.start
    }

    /// Sunday of the week. May fall in the following year.
    pub fn last_day(&self) -> NaiveDate {
        self.start.week(Weekday::Mon).last_day()
    }

    /// Returns `true` if `date` falls within this week's span.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day() <= date && date <= self.last_day()
    }

    /// Human readable span, e.g. `Jun 10 - Jun 16, 2024`.
    ///
    /// When the span crosses a year boundary both years are shown:
    /// `Dec 30, 2024 - Jan 05, 2025`.
    pub fn display_range(&self) -> String {
        let first = self.first_day();
        let last = self.last_day();
        if first.year() == last.year() {
            format!("{} - {}", first.format("%b %d"), last.format("%b %d, %Y"))
        } else {
            format!("{} - {}", first.format("%b %d, %Y"), last.format("%b %d, %Y"))
        }
    }
}

fn days_until_monday(date: NaiveDate) -> u64 {
    u64::from((7 - date.weekday().num_days_from_monday()) % 7)
}

/// Key of the week containing the local date of `now`.
pub fn current_week_key(now: &DateTime<Local>) -> WeekKey {
    WeekKey::current(now)
}

/// Formats a textual week key as its displayed date span.
///
/// # Errors
///
/// [`TrackerError::InvalidWeekKey`] if `key` is malformed or names a week
/// that does not exist in its year.
///
/// # Examples
///
/// ```
/// use family_run::week::week_display;
///
/// assert_eq!(week_display("2024-W53").unwrap(), "Dec 30, 2024 - Jan 05, 2025");
/// assert!(week_display("2023-W53").is_err());
/// ```
pub fn week_display(key: &str) -> Result<String, TrackerError> {
    Ok(key.parse::<WeekKey>()?.display_range())
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| TrackerError::InvalidWeekKey {
            key: s.to_string(),
            reason: reason.to_string(),
        };

        let (year, week) = s
            .split_once("-W")
            .ok_or_else(|| malformed("expected the form YYYY-Wnn"))?;

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("year must be four digits"));
        }
        if week.is_empty() || week.len() > 2 || !week.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("week must be one or two digits"));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| malformed("year must be four digits"))?;
        let week: u32 = week
            .parse()
            .map_err(|_| malformed("week must be one or two digits"))?;

        Self::new(year, week)
    }
}

impl Serialize for WeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
