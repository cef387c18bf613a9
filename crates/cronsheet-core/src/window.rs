//! Query windows.
//!
//! A [`Window`] is an inclusive pair of absolute instants. Month and day
//! windows are built from local wall-clock bounds in a given zone and
//! converted to UTC independently, so DST transitions inside the window
//! are handled the same way as bucket boundaries.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::error::{CronsheetError, Result};
use crate::models::Policy;
use crate::tz::resolve_local;

/// Inclusive `[start, end]` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Which end of a window a textual bound describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// A bare date means local 00:00:00.
    Start,
    /// A bare date means local 23:59:59.
    End,
}

impl Window {
    /// Window over `[start, end]`; an inverted pair gives an empty window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `[day 1 00:00:00, last day 23:59:59]` of a month, local to `tz`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cronsheet_core::tz::parse_tz;
    /// use cronsheet_core::window::Window;
    ///
    /// let tz = parse_tz("Asia/Jerusalem").unwrap();
    /// let window = Window::month(2026, 2, tz).unwrap();
    /// assert_eq!(window.start.to_rfc3339(), "2026-01-31T22:00:00+00:00");
    /// assert_eq!(window.end.to_rfc3339(), "2026-02-28T21:59:59+00:00");
    /// ```
    pub fn month(year: i32, month: u32, tz: Tz) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CronsheetError::InvalidDate(format!("{year}-{month:02}")))?;
        let next = first
            .checked_add_months(chrono::Months::new(1))
            .ok_or_else(|| CronsheetError::InvalidDate(format!("{year}-{month:02}")))?;
        let last = next
            .pred_opt()
            .ok_or_else(|| CronsheetError::InvalidDate(format!("{year}-{month:02}")))?;
        Self::span(first, last, tz)
    }

    /// `[00:00:00, 23:59:59]` of a single local day.
    pub fn day(date: NaiveDate, tz: Tz) -> Result<Self> {
        Self::span(date, date, tz)
    }

    fn span(first: NaiveDate, last: NaiveDate, tz: Tz) -> Result<Self> {
        Ok(Self {
            start: local_bound(first, Bound::Start, tz)?,
            end: local_bound(last, Bound::End, tz)?,
        })
    }

    /// Parse a window from two textual bounds (see [`parse_bound`]).
    pub fn parse(start: &str, end: &str, tz: Tz) -> Result<Self> {
        Ok(Self {
            start: parse_bound(start, Bound::Start, tz)?,
            end: parse_bound(end, Bound::End, tz)?,
        })
    }

    /// Whether `instant` lies inside the window, both ends included.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// True when the end lies before the start.
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

fn local_bound(date: NaiveDate, bound: Bound, tz: Tz) -> Result<DateTime<Utc>> {
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
    };
    resolve_local(date.and_time(time), tz, Policy::default())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| CronsheetError::InvalidDate(format!("{date} {time} in {tz}")))
}

/// Parse one window bound.
///
/// Accepts RFC3339 (`2026-03-01T00:00:00Z`) or a bare `YYYY-MM-DD` date,
/// which is read as the start or end of that day local to `tz`.
pub fn parse_bound(input: &str, bound: Bound, tz: Tz) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    match parse_day_key(trimmed) {
        Ok(date) => local_bound(date, bound, tz),
        Err(_) => Err(CronsheetError::ParseError(format!(
            "Invalid window bound: '{}'. Expected RFC3339 or YYYY-MM-DD",
            input
        ))),
    }
}

/// Parse a `YYYY-MM-DD` day key.
pub fn parse_day_key(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| {
        CronsheetError::ParseError(format!("Invalid day '{}': {}", input, e))
    })
}

/// `(year, month)` of the month after the given one.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// `(year, month)` of the month before the given one.
pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// `(year, month)` of a date.
pub fn year_month(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
