//! Month bucketing.
//!
//! Expands every job over one calendar month and groups the resulting
//! occurrences by day. Both the month window and the day key are taken in
//! each job's own zone, so a job firing at 23:30 in Tokyo lands on the
//! Tokyo date regardless of where the calendar is viewed.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::field::CronSchedule;
use crate::models::{CanonicalJob, DayBuckets, Occurrence, Policy};
use crate::tz::parse_tz;
use crate::window::Window;

/// Group the occurrences of `jobs` in `year`-`month` by local day.
///
/// Within a day, occurrences follow job order first and time second;
/// sorting chronologically is left to presentation. An invalid month
/// yields an empty map.
pub fn bucket_by_day(jobs: &[CanonicalJob], year: i32, month: u32) -> DayBuckets {
    bucket_by_day_with_policy(jobs, year, month, Policy::default())
}

/// [`bucket_by_day`] with an explicit DST policy.
pub fn bucket_by_day_with_policy(
    jobs: &[CanonicalJob],
    year: i32,
    month: u32,
    policy: Policy,
) -> DayBuckets {
    let mut buckets = DayBuckets::new();
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        warn!(year, month, "not a calendar month");
        return buckets;
    }

    for job in jobs {
        let Some(schedule) = CronSchedule::parse(&job.cron) else {
            debug!(cron = %job.cron, name = %job.name, "skipping malformed cron expression");
            continue;
        };
        let Ok(tz) = parse_tz(&job.timezone) else {
            warn!(timezone = %job.timezone, name = %job.name, "skipping job in unknown timezone");
            continue;
        };
        let Ok(window) = Window::month(year, month, tz) else {
            continue;
        };

        for scheduled_time in schedule.occurrences(tz, &window, policy) {
            buckets
                .entry(scheduled_time.date_naive())
                .or_default()
                .push(Occurrence {
                    job: job.clone(),
                    scheduled_time,
                });
        }
    }

    debug!(year, month, days = buckets.len(), "bucketed month");
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::day_key;
    use crate::tz::format_rfc3339;

    fn job(name: &str, cron: &str, timezone: &str) -> CanonicalJob {
        CanonicalJob {
            cron: cron.to_string(),
            timezone: timezone.to_string(),
            name: name.to_string(),
            ..CanonicalJob::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_monthly_job() {
        let jobs = vec![job("report", "30 14 1 * *", "Asia/Jerusalem")];
        let buckets = bucket_by_day(&jobs, 2026, 3);
        assert_eq!(buckets.len(), 1);
        let day = &buckets[&date(2026, 3, 1)];
        assert_eq!(day.len(), 1);
        assert_eq!(format_rfc3339(&day[0].scheduled_time), "2026-03-01T14:30:00+02:00");
        assert_eq!(day[0].job.name, "report");
    }

    #[test]
    fn day_bucket_follows_job_order_not_time() {
        let jobs = vec![
            job("late", "0 20 10 3 *", "UTC"),
            job("early", "0 6 10 3 *", "UTC"),
        ];
        let buckets = bucket_by_day(&jobs, 2026, 3);
        let names: Vec<_> = buckets[&date(2026, 3, 10)]
            .iter()
            .map(|o| o.job.name.as_str())
            .collect();
        assert_eq!(names, vec!["late", "early"]);
    }

    #[test]
    fn keys_use_each_jobs_own_zone() {
        // 23:30 in Tokyo on the 1st is 14:30 UTC the same day;
        // 23:30 in Los Angeles on the 1st is already the 2nd in UTC
        let jobs = vec![
            job("tokyo", "30 23 1 4 *", "Asia/Tokyo"),
            job("la", "30 23 1 4 *", "America/Los_Angeles"),
        ];
        let buckets = bucket_by_day(&jobs, 2026, 4);
        let keys: Vec<_> = buckets.keys().map(|d| day_key(*d)).collect();
        assert_eq!(keys, vec!["2026-04-01"]);
        assert_eq!(buckets[&date(2026, 4, 1)].len(), 2);
    }

    #[test]
    fn window_is_the_month_in_the_jobs_zone() {
        // midnight on the 1st in Auckland is still the previous month in UTC
        let jobs = vec![job("nz", "0 0 1 * *", "Pacific/Auckland")];
        let buckets = bucket_by_day(&jobs, 2026, 5);
        assert_eq!(buckets.keys().copied().collect::<Vec<_>>(), vec![date(2026, 5, 1)]);
    }

    #[test]
    fn bad_jobs_are_skipped() {
        let jobs = vec![
            job("short", "0 9 * *", "UTC"),
            job("nowhere", "0 9 * * *", "Nowhere/Land"),
            job("ok", "0 9 2 3 *", "UTC"),
        ];
        let buckets = bucket_by_day(&jobs, 2026, 3);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[&date(2026, 3, 2)][0].job.name, "ok");
    }

    #[test]
    fn lower_cased_zone_from_a_sheet_still_fires() {
        let header = vec!["cron".to_string(), "timezone".to_string()];
        let rows = vec![vec!["30 14 1 * *".to_string(), "asia/jerusalem".to_string()]];
        let jobs = crate::normalize::normalize(&header, &rows);

        let buckets = bucket_by_day(&jobs, 2026, 3);
        assert_eq!(buckets.len(), 1);
        assert_eq!(
            format_rfc3339(&buckets[&date(2026, 3, 1)][0].scheduled_time),
            "2026-03-01T14:30:00+02:00"
        );
    }

    #[test]
    fn invalid_month_is_empty() {
        let jobs = vec![job("daily", "0 9 * * *", "UTC")];
        assert!(bucket_by_day(&jobs, 2026, 0).is_empty());
        assert!(bucket_by_day(&jobs, 2026, 13).is_empty());
    }

    #[test]
    fn repeated_bucketing_is_identical() {
        let jobs = vec![
            job("a", "*/30 9-10 * * 1-5", "Europe/Berlin"),
            job("b", "0 0 * * *", "Asia/Jerusalem"),
        ];
        assert_eq!(bucket_by_day(&jobs, 2026, 3), bucket_by_day(&jobs, 2026, 3));
    }

    #[test]
    fn daily_job_fills_every_day() {
        let jobs = vec![job("daily", "0 9 * * *", "UTC")];
        let buckets = bucket_by_day(&jobs, 2026, 2);
        assert_eq!(buckets.len(), 28);
        assert!(buckets.values().all(|day| day.len() == 1));
    }
}
