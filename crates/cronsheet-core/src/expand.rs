//! Occurrence expansion.
//!
//! A cron schedule is expanded by walking the local calendar days of the
//! window in the schedule's own zone. Qualifying days get one wall-clock
//! instant per `(hour, minute)` pair; each instant is resolved to an
//! absolute time independently, so DST changes inside the window only
//! affect the days they happen on.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::field::CronSchedule;
use crate::models::Policy;
use crate::tz::{parse_tz, resolve_local};
use crate::window::Window;

impl CronSchedule {
    /// Every firing of the schedule inside `window`, in `tz`'s calendar.
    ///
    /// Days are walked from the local date of `window.start` through the
    /// local date of `window.end`; instants outside the window on those
    /// first and last days are dropped.
    pub fn occurrences(&self, tz: Tz, window: &Window, policy: Policy) -> Vec<DateTime<Tz>> {
        let mut found = Vec::new();
        if window.is_empty() {
            return found;
        }

        let first_day = window.start.with_timezone(&tz).date_naive();
        let last_day = window.end.with_timezone(&tz).date_naive();

        for day in first_day.iter_days().take_while(|day| *day <= last_day) {
            let day_of_week = day.weekday().num_days_from_sunday();
            if !self.matches_day(day.month(), day.day(), day_of_week) {
                continue;
            }

            for (hour, minute) in self.times() {
                let Some(local) = day.and_hms_opt(hour, minute, 0) else {
                    continue;
                };
                let Some(instant) = resolve_local(local, tz, policy) else {
                    continue;
                };
                if window.contains(instant.with_timezone(&Utc)) {
                    found.push(instant);
                }
            }
        }

        found
    }
}

/// Expand `cron` in the zone named `timezone` over `[window_start, window_end]`.
///
/// Malformed expressions and unknown zones yield no occurrences rather than
/// an error.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cronsheet_core::expand::expand;
///
/// let start = Utc.with_ymd_and_hms(2026, 2, 28, 22, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 3, 31, 20, 59, 59).unwrap();
/// let hits = expand("30 14 1 * *", "Asia/Jerusalem", start, end);
///
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].to_rfc3339(), "2026-03-01T14:30:00+02:00");
/// ```
pub fn expand(
    cron: &str,
    timezone: &str,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<DateTime<Tz>> {
    expand_with_policy(
        cron,
        timezone,
        &Window::new(window_start, window_end),
        Policy::default(),
    )
}

/// [`expand`] with an explicit window and DST policy.
pub fn expand_with_policy(
    cron: &str,
    timezone: &str,
    window: &Window,
    policy: Policy,
) -> Vec<DateTime<Tz>> {
    let Some(schedule) = CronSchedule::parse(cron) else {
        debug!(cron, "skipping malformed cron expression");
        return Vec::new();
    };
    let Ok(tz) = parse_tz(timezone) else {
        warn!(timezone, "skipping schedule in unknown timezone");
        return Vec::new();
    };
    schedule.occurrences(tz, window, policy)
}
