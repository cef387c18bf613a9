//! Core data types for cronsheet.
//!
//! This module defines the primary types used throughout the library:
//! - [`SheetValues`] - A raw spreadsheet range read (header + data rows)
//! - [`CanonicalJob`] - One normalized, schema-independent schedule row
//! - [`Occurrence`] - One concrete firing of a job
//! - [`OccurrenceRecord`] - Serializable rendering of an occurrence
//! - [`NonexistentPolicy`] / [`AmbiguousPolicy`] / [`Policy`] - DST handling
//! - [`DayBuckets`] - Occurrences grouped by local calendar day

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::tz::{format_rfc3339, format_rfc3339_utc};

/// A spreadsheet range as returned by the Sheets `values` endpoint.
///
/// The first row is the header; every following row is data. A document
/// without a `values` key has no rows at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SheetValues {
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

impl SheetValues {
    /// Split into the header row and the data rows.
    pub fn split(&self) -> (&[String], &[Vec<String>]) {
        match self.values.split_first() {
            Some((header, rows)) => (header.as_slice(), rows),
            None => (&[], &[]),
        }
    }
}

/// The normalized record produced from one spreadsheet row.
///
/// `cron` is never empty; every other field may be an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalJob {
    /// Five-field cron expression.
    pub cron: String,
    /// IANA zone name, already passed through [`crate::tz::normalize_tz`].
    pub timezone: String,
    /// Display category used for grouping and coloring.
    #[serde(rename = "class")]
    pub job_class: String,
    /// Raw or synthesized argument payload.
    pub args: String,
    /// Owning client/account identifier.
    pub account: String,
    /// Human display name.
    pub name: String,
    pub description: String,
}

/// One concrete firing of a [`CanonicalJob`].
///
/// The scheduled time is an absolute instant carried in the job's own
/// zone, so it can be rendered in any display zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub job: CanonicalJob,
    pub scheduled_time: DateTime<Tz>,
}

impl Occurrence {
    /// Local calendar day of the firing in the job's zone.
    pub fn day(&self) -> NaiveDate {
        self.scheduled_time.date_naive()
    }
}

/// Serializable view of an [`Occurrence`].
#[derive(Debug, Clone, Serialize)]
pub struct OccurrenceRecord {
    /// Firing time in the job's zone (RFC3339 with offset).
    pub scheduled_local: String,
    /// Firing time in UTC (RFC3339 with Z suffix).
    pub scheduled_utc: String,
    /// Epoch milliseconds (UTC).
    pub epoch_ms: i64,
    #[serde(flatten)]
    pub job: CanonicalJob,
}

impl From<&Occurrence> for OccurrenceRecord {
    fn from(occurrence: &Occurrence) -> Self {
        Self {
            scheduled_local: format_rfc3339(&occurrence.scheduled_time),
            scheduled_utc: format_rfc3339_utc(&occurrence.scheduled_time),
            epoch_ms: occurrence.scheduled_time.timestamp_millis(),
            job: occurrence.job.clone(),
        }
    }
}

/// Policy for handling nonexistent local times.
///
/// Nonexistent times occur during DST spring forward when a range
/// of local times is skipped (e.g., 02:00-02:59 in Europe/Berlin).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonexistentPolicy {
    /// Shift forward by the length of the gap.
    #[default]
    ShiftForward,
    /// Drop the firing entirely.
    Skip,
}

/// Policy for handling ambiguous local times.
///
/// Ambiguous times occur during DST fall back when a range
/// of local times occurs twice (e.g., 02:00-02:59 in Europe/Berlin).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmbiguousPolicy {
    /// Use the first occurrence (earlier offset, still in DST).
    #[default]
    First,
    /// Use the second occurrence (later offset, back to standard time).
    Second,
}

/// Combined DST handling policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    /// How to handle nonexistent local times.
    pub nonexistent: NonexistentPolicy,
    /// How to handle ambiguous local times.
    pub ambiguous: AmbiguousPolicy,
}

/// Occurrences keyed by calendar day in each job's own zone.
///
/// Days iterate in calendar order; each bucket keeps job-iteration order.
pub type DayBuckets = BTreeMap<NaiveDate, Vec<Occurrence>>;

/// Render a day key the way the calendar grid addresses days.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
