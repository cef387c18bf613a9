//! Cron field parsing.
//!
//! Each of the five cron fields is parsed into the ordered set of integers
//! it matches. Parsing never fails: tokens that cannot be read contribute
//! nothing, so a field made only of junk matches nothing.
//!
//! Token forms, separated by commas:
//! - `*` or empty: every value of the field
//! - `start/step` and `*/step`: `start, start+step, ...` up to the field max
//! - `start-end/step`: the same sequence bounded by `end`
//! - `start-end`: inclusive range (empty when `end < start`)
//! - `n`: a single value

use std::collections::BTreeSet;

pub const MINUTE_MAX: u32 = 59;
pub const HOUR_MAX: u32 = 23;
pub const DAY_OF_MONTH_MAX: u32 = 31;
pub const MONTH_MAX: u32 = 12;
/// 0 = Sunday .. 6 = Saturday.
pub const DAY_OF_WEEK_MAX: u32 = 6;

/// Parse a field whose values start at zero.
///
/// # Examples
///
/// ```
/// use cronsheet_core::field::parse_field;
///
/// let quarters: Vec<u32> = parse_field("*/15", 59).into_iter().collect();
/// assert_eq!(quarters, vec![0, 15, 30, 45]);
/// ```
pub fn parse_field(text: &str, max: u32) -> BTreeSet<u32> {
    parse_bounded(text, 0, max)
}

/// Parse the month field, whose values run from 1 to 12.
pub fn parse_month_field(text: &str) -> BTreeSet<u32> {
    parse_bounded(text, 1, MONTH_MAX)
}

fn parse_bounded(text: &str, min: u32, max: u32) -> BTreeSet<u32> {
    let mut values = BTreeSet::new();
    for token in text.split(',').map(str::trim) {
        if token == "*" || token.is_empty() {
            values.extend(min..=max);
        } else if let Some((base, step)) = token.split_once('/') {
            let Some(step) = parse_number(step).filter(|s| *s > 0) else {
                continue;
            };
            let (start, end) = match base {
                "*" | "" => (min, max),
                _ => match base.split_once('-') {
                    Some((a, b)) => match (parse_number(a), parse_number(b)) {
                        (Some(a), Some(b)) => (a, b.min(max)),
                        _ => continue,
                    },
                    None => match parse_number(base) {
                        Some(a) => (a, max),
                        None => continue,
                    },
                },
            };
            values.extend((start..=end).step_by(step as usize).filter(|v| *v >= min));
        } else if let Some((a, b)) = token.split_once('-') {
            if let (Some(a), Some(b)) = (parse_number(a), parse_number(b)) {
                values.extend(a.max(min)..=b.min(max));
            }
        } else if let Some(n) = parse_number(token).filter(|n| (min..=max).contains(n)) {
            values.insert(n);
        }
    }
    values
}

fn parse_number(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

/// A five-field cron expression parsed into per-field value sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    pub minutes: BTreeSet<u32>,
    pub hours: BTreeSet<u32>,
    pub days_of_month: BTreeSet<u32>,
    pub months: BTreeSet<u32>,
    pub days_of_week: BTreeSet<u32>,
}

impl CronSchedule {
    /// Parse a whitespace-separated cron expression.
    ///
    /// Returns `None` when fewer than five fields are present. Fields past
    /// the fifth are ignored.
    pub fn parse(expression: &str) -> Option<Self> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        let [minute, hour, day_of_month, month, day_of_week, ..] = fields.as_slice() else {
            return None;
        };

        Some(Self {
            minutes: parse_field(minute, MINUTE_MAX),
            hours: parse_field(hour, HOUR_MAX),
            days_of_month: parse_field(day_of_month, DAY_OF_MONTH_MAX),
            months: parse_month_field(month),
            days_of_week: parse_field(day_of_week, DAY_OF_WEEK_MAX),
        })
    }

    /// Whether a calendar day qualifies.
    ///
    /// Month, day-of-month and day-of-week must all match. This is
    /// stricter than POSIX cron, which ORs day-of-month with day-of-week
    /// when both are restricted.
    pub fn matches_day(&self, month: u32, day_of_month: u32, day_of_week: u32) -> bool {
        self.months.contains(&month)
            && self.days_of_month.contains(&day_of_month)
            && self.days_of_week.contains(&day_of_week)
    }

    /// Every `(hour, minute)` pair of the schedule, in chronological order.
    pub fn times(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.hours
            .iter()
            .flat_map(move |h| self.minutes.iter().map(move |m| (*h, *m)))
    }
}
