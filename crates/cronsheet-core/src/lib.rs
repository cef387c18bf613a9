//! # cronsheet-core
//!
//! Turns spreadsheet-stored job schedules into calendar days.
//!
//! Sheets list jobs as rows carrying a five-field cron expression and a
//! per-row timezone, in one of several column layouts. This library
//! normalizes those rows into [`CanonicalJob`]s and expands their cron
//! schedules into concrete, timezone-correct occurrences for a month.
//!
//! ## Features
//!
//! - **Schema-tolerant rows**: feed, delivery and ETL sheets are resolved
//!   through ordered candidate column names, with Ruby-hash-tolerant
//!   parsing of argument payloads.
//! - **Local-calendar expansion**: days, hours and minutes are matched in
//!   each job's own zone and every firing is an absolute instant.
//! - **DST handling**: nonexistent wall-clock times shift forward, ambiguous
//!   ones take the first occurrence (configurable via [`Policy`]).
//! - **Graceful degradation**: malformed rows and cron expressions yield
//!   nothing instead of errors.
//!
//! ## Example
//!
//! ```rust
//! use cronsheet_core::prelude::*;
//!
//! let sheet = SheetValues {
//!     values: vec![
//!         vec!["cron".into(), "timezone".into()],
//!         vec!["30 14 1 * *".into(), "Israel".into()],
//!     ],
//! };
//!
//! let jobs = normalize_values(&sheet);
//! let days = bucket_by_day(&jobs, 2026, 3);
//!
//! for (day, occurrences) in &days {
//!     println!("{}: {} job(s)", day_key(*day), occurrences.len());
//! }
//! ```

pub mod bucket;
pub mod error;
pub mod expand;
pub mod field;
pub mod filter;
pub mod loose;
pub mod models;
pub mod normalize;
pub mod session;
pub mod tz;
pub mod window;

// Re-export commonly used types at the crate root
pub use bucket::{bucket_by_day, bucket_by_day_with_policy};
pub use error::{CronsheetError, Result};
pub use expand::{expand, expand_with_policy};
pub use field::{CronSchedule, parse_field, parse_month_field};
pub use filter::{DayFilter, DayView, SearchField, SearchTerm, TimeGroup, TimeWindow};
pub use models::{
    AmbiguousPolicy, CanonicalJob, DayBuckets, NonexistentPolicy, Occurrence, OccurrenceRecord,
    Policy, SheetValues, day_key,
};
pub use normalize::{normalize, normalize_values};
pub use session::CalendarSession;
pub use window::Window;

/// Prelude module for convenient imports.
///
/// ```
/// use cronsheet_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bucket::bucket_by_day;
    pub use crate::error::{CronsheetError, Result};
    pub use crate::expand::expand;
    pub use crate::filter::{DayFilter, DayView, SearchTerm, TimeWindow};
    pub use crate::models::*;
    pub use crate::normalize::{normalize, normalize_values};
    pub use crate::tz::{normalize_tz, parse_tz};
    pub use crate::window::Window;
}
