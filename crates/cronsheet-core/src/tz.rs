//! Timezone handling utilities.
//!
//! This module parses timezone names, canonicalizes the spreadsheet
//! aliases, and turns local wall-clock times into absolute instants with
//! explicit handling of DST gaps and overlaps.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::error::{CronsheetError, Result};
use crate::models::{AmbiguousPolicy, NonexistentPolicy, Policy};

/// Zone used when a row names no timezone.
pub const FALLBACK_TIMEZONE: &str = "Asia/Jerusalem";

/// Human spellings that sheets use for [`FALLBACK_TIMEZONE`].
const FALLBACK_ALIASES: [&str; 2] = ["Israel", "Jerusalem"];

/// Parse an IANA timezone name into a [`chrono_tz::Tz`].
///
/// Names are matched exactly first, then ignoring case, so a sheet cell
/// reading `asia/jerusalem` still resolves.
///
/// # Examples
///
/// ```
/// use cronsheet_core::tz::parse_tz;
///
/// let tz = parse_tz("Asia/Jerusalem").unwrap();
/// assert_eq!(tz.to_string(), "Asia/Jerusalem");
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .or_else(|_| Tz::from_str_insensitive(name))
        .map_err(|_| CronsheetError::InvalidTimezone(name.to_string()))
}

/// Canonicalize a timezone cell.
///
/// Empty cells and the two human aliases map to [`FALLBACK_TIMEZONE`];
/// anything else passes through unchanged, valid or not.
///
/// ```
/// use cronsheet_core::tz::{normalize_tz, FALLBACK_TIMEZONE};
///
/// assert_eq!(normalize_tz("Israel"), FALLBACK_TIMEZONE);
/// assert_eq!(normalize_tz(""), FALLBACK_TIMEZONE);
/// assert_eq!(normalize_tz("UTC"), "UTC");
/// ```
pub fn normalize_tz(tz: &str) -> String {
    if tz.is_empty() || FALLBACK_ALIASES.contains(&tz) {
        FALLBACK_TIMEZONE.to_string()
    } else {
        tz.to_string()
    }
}

/// Resolve a local wall-clock time in `tz` to an absolute instant.
///
/// Ambiguous times (fall back) pick the first or second occurrence per
/// `policy.ambiguous`. Nonexistent times (spring forward) are either
/// skipped or shifted forward by the length of the gap, so 02:30 in a
/// 02:00 -> 03:00 transition becomes 03:30.
pub fn resolve_local(local: NaiveDateTime, tz: Tz, policy: Policy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(first, second) => match policy.ambiguous {
            AmbiguousPolicy::First => Some(first),
            AmbiguousPolicy::Second => Some(second),
        },
        LocalResult::None => match policy.nonexistent {
            NonexistentPolicy::Skip => None,
            NonexistentPolicy::ShiftForward => shift_forward(local, tz),
        },
    }
}

/// Interpret `local` with the offset in force before the gap.
fn shift_forward(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    let before = tz
        .from_local_datetime(&(local - Duration::days(1)))
        .earliest()?;
    let offset = before.offset().fix().local_minus_utc();
    let utc = local - Duration::seconds(i64::from(offset));
    Some(tz.from_utc_datetime(&utc))
}

/// Format a datetime as RFC3339 with timezone offset.
///
/// # Returns
///
/// An RFC3339 formatted string (e.g., "2026-03-01T14:30:00+02:00").
pub fn format_rfc3339<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Format an instant in UTC with a Z suffix.
pub fn format_rfc3339_utc<T: TimeZone>(dt: &DateTime<T>) -> String {
    dt.with_timezone(&chrono::Utc)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn parse_valid_timezone() {
        let tz = parse_tz("Europe/Berlin").unwrap();
        assert_eq!(tz.to_string(), "Europe/Berlin");
    }

    #[test]
    fn parse_timezone_ignores_case() {
        assert_eq!(parse_tz("asia/jerusalem").unwrap(), chrono_tz::Asia::Jerusalem);
        assert_eq!(parse_tz("AMERICA/NEW_YORK").unwrap(), chrono_tz::America::New_York);
        assert_eq!(parse_tz("utc").unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn parse_invalid_timezone() {
        let result = parse_tz("Invalid/Timezone");
        if let Err(CronsheetError::InvalidTimezone(name)) = result {
            assert_eq!(name, "Invalid/Timezone");
        } else {
            panic!("Expected InvalidTimezone error");
        }
    }

    #[test]
    fn aliases_share_the_fallback_zone() {
        assert_eq!(normalize_tz("Israel"), normalize_tz(""));
        assert_eq!(normalize_tz("Jerusalem"), normalize_tz(""));
        assert_eq!(normalize_tz("Europe/Berlin"), "Europe/Berlin");
        // aliases are matched exactly
        assert_eq!(normalize_tz("israel"), "israel");
    }

    #[test]
    fn resolve_plain_local_time() {
        let tz = parse_tz("Europe/Berlin").unwrap();
        let dt = resolve_local(local(2026, 3, 28, 12, 0), tz, Policy::default()).unwrap();
        assert_eq!(format_rfc3339_utc(&dt), "2026-03-28T11:00:00Z");
    }

    #[test]
    fn spring_forward_gap_shifts_forward() {
        // Berlin skips 02:00-02:59 on 2026-03-29
        let tz = parse_tz("Europe/Berlin").unwrap();
        let dt = resolve_local(local(2026, 3, 29, 2, 30), tz, Policy::default()).unwrap();
        assert_eq!(format_rfc3339(&dt), "2026-03-29T03:30:00+02:00");
        assert_eq!(format_rfc3339_utc(&dt), "2026-03-29T01:30:00Z");
    }

    #[test]
    fn spring_forward_gap_can_be_skipped() {
        let tz = parse_tz("Europe/Berlin").unwrap();
        let policy = Policy {
            nonexistent: NonexistentPolicy::Skip,
            ..Policy::default()
        };
        assert!(resolve_local(local(2026, 3, 29, 2, 30), tz, policy).is_none());
    }

    #[test]
    fn fall_back_overlap_picks_per_policy() {
        // Berlin repeats 02:00-02:59 on 2026-10-25
        let tz = parse_tz("Europe/Berlin").unwrap();
        let first = resolve_local(local(2026, 10, 25, 2, 30), tz, Policy::default()).unwrap();
        assert_eq!(format_rfc3339(&first), "2026-10-25T02:30:00+02:00");

        let policy = Policy {
            ambiguous: AmbiguousPolicy::Second,
            ..Policy::default()
        };
        let second = resolve_local(local(2026, 10, 25, 2, 30), tz, policy).unwrap();
        assert_eq!(format_rfc3339(&second), "2026-10-25T02:30:00+01:00");
    }

    #[test]
    fn format_utc_from_any_zone() {
        let tz = parse_tz("Asia/Jerusalem").unwrap();
        let dt = tz.with_ymd_and_hms(2026, 3, 1, 14, 30, 0).single().unwrap();
        assert_eq!(format_rfc3339(&dt), "2026-03-01T14:30:00+02:00");
        assert_eq!(format_rfc3339_utc(&dt), "2026-03-01T12:30:00Z");
    }
}
