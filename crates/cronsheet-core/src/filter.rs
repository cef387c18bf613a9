//! Day detail view.
//!
//! Narrows one day's occurrences by a time-of-day window and free-text
//! search terms, orders what remains chronologically, and groups it by
//! `HH:MM` in a display zone.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{CronsheetError, Result};
use crate::models::{CanonicalJob, Occurrence};

/// Earliest hour accepted by a time window.
pub const DAY_START_HOUR: f64 = 0.0;
/// Latest hour accepted by a time window (23:59.4).
pub const DAY_END_HOUR: f64 = 23.99;

/// Job attribute a [`SearchTerm`] looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Account,
    Job,
    Args,
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchField::Account => write!(f, "account"),
            SearchField::Job => write!(f, "job"),
            SearchField::Args => write!(f, "args"),
        }
    }
}

impl FromStr for SearchField {
    type Err = CronsheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "account" => Ok(SearchField::Account),
            "job" => Ok(SearchField::Job),
            "args" => Ok(SearchField::Args),
            _ => Err(CronsheetError::ParseError(format!(
                "Unknown search field: '{}'. Expected 'account', 'job', or 'args'",
                s
            ))),
        }
    }
}

/// Case-insensitive substring match on one job attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTerm {
    pub field: SearchField,
    pub value: String,
}

impl SearchTerm {
    /// A term matching `value` inside `field`.
    pub fn new(field: SearchField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Whether the job's attribute contains the value, ignoring case.
    pub fn matches(&self, job: &CanonicalJob) -> bool {
        let haystack = match self.field {
            SearchField::Account => &job.account,
            SearchField::Job => &job.name,
            SearchField::Args => &job.args,
        };
        haystack
            .to_lowercase()
            .contains(&self.value.trim().to_lowercase())
    }
}

impl FromStr for SearchTerm {
    type Err = CronsheetError;

    /// Parse `field=value`, e.g. `account=acme`.
    fn from_str(s: &str) -> Result<Self> {
        let (field, value) = s.split_once('=').ok_or_else(|| {
            CronsheetError::ParseError(format!(
                "Invalid filter: '{}'. Expected field=value",
                s
            ))
        })?;
        if value.trim().is_empty() {
            return Err(CronsheetError::ParseError(format!(
                "Invalid filter: '{}'. Search value is empty",
                s
            )));
        }
        Ok(Self::new(field.parse()?, value.trim()))
    }
}

/// Inclusive range of fractional hours, e.g. 9.5 is 09:30.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start_hour: f64,
    pub end_hour: f64,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            start_hour: DAY_START_HOUR,
            end_hour: DAY_END_HOUR,
        }
    }
}

impl TimeWindow {
    /// Clamp both ends into the day; an inverted window is rejected.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when either bound is NaN or the start lies
    /// after the end.
    pub fn new(start_hour: f64, end_hour: f64) -> Result<Self> {
        if start_hour.is_nan() || end_hour.is_nan() {
            return Err(CronsheetError::ParseError(format!(
                "Invalid time window: {start_hour} to {end_hour} is not a number"
            )));
        }
        let start_hour = start_hour.clamp(DAY_START_HOUR, DAY_END_HOUR);
        let end_hour = end_hour.clamp(DAY_START_HOUR, DAY_END_HOUR);
        if start_hour > end_hour {
            return Err(CronsheetError::ParseError(format!(
                "Invalid time window: {start_hour} is after {end_hour}"
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// Whether `hour:minute` lies inside the window, both ends included.
    pub fn contains(&self, hour: u32, minute: u32) -> bool {
        let at = f64::from(hour) + f64::from(minute) / 60.0;
        self.start_hour <= at && at <= self.end_hour
    }

    /// True for the default `0.0..=23.99` window.
    pub fn is_full_day(&self) -> bool {
        *self == Self::default()
    }
}

/// Every criterion an occurrence must pass to be shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayFilter {
    pub time_window: TimeWindow,
    /// All terms must match.
    pub terms: Vec<SearchTerm>,
}

impl DayFilter {
    /// Whether `occurrence` falls in the time window, read in `display_tz`,
    /// and satisfies every search term.
    pub fn matches(&self, occurrence: &Occurrence, display_tz: Tz) -> bool {
        let local = occurrence.scheduled_time.with_timezone(&display_tz);
        self.time_window.contains(local.hour(), local.minute())
            && self.terms.iter().all(|term| term.matches(&occurrence.job))
    }

    /// True when any search term is set.
    pub fn is_active(&self) -> bool {
        !self.terms.is_empty()
    }
}

/// Occurrences sharing one `HH:MM` in the display zone.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGroup {
    pub time: String,
    pub occurrences: Vec<Occurrence>,
}

/// Filtered, ordered and grouped occurrences of one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub date: NaiveDate,
    pub display_tz: Tz,
    /// Occurrences before filtering.
    pub total: usize,
    pub groups: Vec<TimeGroup>,
}

impl DayView {
    /// Filter `occurrences` of `date`, sort what passes by instant and group
    /// it by wall-clock `HH:MM` in `display_tz`.
    pub fn build(
        date: NaiveDate,
        occurrences: &[Occurrence],
        filter: &DayFilter,
        display_tz: Tz,
    ) -> Self {
        let mut shown: Vec<&Occurrence> = occurrences
            .iter()
            .filter(|occurrence| filter.matches(occurrence, display_tz))
            .collect();
        shown.sort_by_key(|occurrence| occurrence.scheduled_time.timestamp());

        let mut groups: Vec<TimeGroup> = Vec::new();
        for occurrence in shown {
            let time = occurrence
                .scheduled_time
                .with_timezone(&display_tz)
                .format("%H:%M")
                .to_string();
            match groups.iter_mut().find(|group| group.time == time) {
                Some(group) => group.occurrences.push(occurrence.clone()),
                None => groups.push(TimeGroup {
                    time,
                    occurrences: vec![occurrence.clone()],
                }),
            }
        }

        Self {
            date,
            display_tz,
            total: occurrences.len(),
            groups,
        }
    }

    /// Number of occurrences that passed the filter.
    pub fn shown(&self) -> usize {
        self.groups.iter().map(|group| group.occurrences.len()).sum()
    }

    /// Shown occurrences in display order.
    pub fn occurrences(&self) -> impl Iterator<Item = &Occurrence> {
        self.groups.iter().flat_map(|group| group.occurrences.iter())
    }

    /// Args of the selected display positions, one per line.
    pub fn args_text(&self, selection: &[usize]) -> String {
        self.occurrences()
            .enumerate()
            .filter(|(position, _)| selection.contains(position))
            .map(|(_, occurrence)| occurrence.job.args.as_str())
            .filter(|args| !args.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `Showing 3 of 10 jobs` while search terms are active, else `Showing 3 jobs`.
    pub fn summary(&self, filter: &DayFilter) -> String {
        if filter.is_active() {
            format!("Showing {} of {} jobs", self.shown(), self.total)
        } else {
            format!("Showing {} jobs", self.shown())
        }
    }
}
