//! Calendar session state.
//!
//! Holds what a calendar screen needs between interactions: which calendar
//! is loaded, its normalized jobs, the month on display and the current
//! selection in the day view. The expansion functions stay stateless; the
//! session only decides what to pass them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::debug;

use crate::bucket::bucket_by_day;
use crate::filter::{DayFilter, DayView};
use crate::models::{CanonicalJob, DayBuckets, Occurrence, SheetValues};
use crate::normalize::normalize_values;
use crate::window::{next_month, prev_month, year_month};

#[derive(Debug, Clone)]
pub struct CalendarSession {
    pub calendar: String,
    pub jobs: Vec<CanonicalJob>,
    pub year: i32,
    pub month: u32,
    /// Zone day views are rendered and time-filtered in.
    pub display_tz: Tz,
    selected: BTreeSet<usize>,
}

impl CalendarSession {
    /// An empty session showing the month of `today`.
    pub fn new(display_tz: Tz, today: NaiveDate) -> Self {
        let (year, month) = year_month(today);
        Self {
            calendar: String::new(),
            jobs: Vec::new(),
            year,
            month,
            display_tz,
            selected: BTreeSet::new(),
        }
    }

    /// Replace the loaded calendar and its jobs. The displayed month stays.
    pub fn load(&mut self, calendar: impl Into<String>, sheet: &SheetValues) {
        self.calendar = calendar.into();
        self.jobs = normalize_values(sheet);
        self.selected.clear();
        debug!(calendar = %self.calendar, jobs = self.jobs.len(), "loaded calendar");
    }

    pub fn next_month(&mut self) {
        (self.year, self.month) = next_month(self.year, self.month);
    }

    pub fn prev_month(&mut self) {
        (self.year, self.month) = prev_month(self.year, self.month);
    }

    /// Day buckets for the displayed month, recomputed on every call.
    pub fn month_view(&self) -> DayBuckets {
        bucket_by_day(&self.jobs, self.year, self.month)
    }

    /// Occurrences on `date`, bucketed afresh for that date's month.
    pub fn day(&self, date: NaiveDate) -> Vec<Occurrence> {
        let (year, month) = year_month(date);
        bucket_by_day(&self.jobs, year, month)
            .remove(&date)
            .unwrap_or_default()
    }

    /// Open the detail view of `date`; any previous selection is dropped.
    pub fn open_day(&mut self, date: NaiveDate, filter: &DayFilter) -> DayView {
        self.selected.clear();
        DayView::build(date, &self.day(date), filter, self.display_tz)
    }

    /// Toggle a display position. With `extend`, only ever add to a
    /// non-empty selection.
    pub fn toggle(&mut self, position: usize, extend: bool) {
        if extend {
            if !self.selected.is_empty() {
                self.selected.insert(position);
            }
        } else if !self.selected.remove(&position) {
            self.selected.insert(position);
        }
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Args of the selected occurrences of `view`, one per line.
    pub fn copy_text(&self, view: &DayView) -> String {
        let selection: Vec<usize> = self.selected.iter().copied().collect();
        view.args_text(&selection)
    }
}
