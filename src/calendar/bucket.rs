//! Week- and month-aligned bucketing of interview records.
//!
//! Both functions are pure: the same inputs always produce the same buckets,
//! and callers rebuild buckets from the latest records instead of patching
//! them. A record joins the bucket whose calendar day equals its local day,
//! compared as dates rather than as time ranges.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, TimeZone};

use super::dates::start_of_week;
use crate::models::{InterviewRecord, YearMonth};

/// A Monday-first week with records grouped by day index (0 = Monday).
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBuckets<'a> {
    pub week_days: [NaiveDate; 7],
    /// Only days that have at least one record are present.
    pub buckets: BTreeMap<usize, Vec<&'a InterviewRecord>>,
}

impl<'a> WeekBuckets<'a> {
    pub fn week_start(&self) -> NaiveDate {
        self.week_days[0]
    }

    /// Records on day `index`, earliest first. Empty for days without records.
    pub fn day(&self, index: usize) -> &[&'a InterviewRecord] {
        self.buckets.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every bucketed record in display order: by day, then by time.
    pub fn records(&self) -> impl Iterator<Item = &'a InterviewRecord> + '_ {
        self.buckets.values().flat_map(|bucket| bucket.iter().copied())
    }

    pub fn ids(&self) -> Vec<String> {
        self.records().map(|r| r.id.clone()).collect()
    }
}

/// A calendar month with records grouped by date.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBuckets<'a> {
    pub month: YearMonth,
    /// Every day of the month, from the 1st to the last.
    pub month_days: Vec<NaiveDate>,
    /// Only dates that have at least one record are present.
    pub buckets: BTreeMap<NaiveDate, Vec<&'a InterviewRecord>>,
    /// Weekday index of the 1st (0 = Sunday): empty cells before it in a
    /// Sunday-first 7-column grid.
    pub leading_blank_count: usize,
}

impl<'a> MonthBuckets<'a> {
    pub fn day(&self, date: &NaiveDate) -> &[&'a InterviewRecord] {
        self.buckets.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn records(&self) -> impl Iterator<Item = &'a InterviewRecord> + '_ {
        self.buckets.values().flat_map(|bucket| bucket.iter().copied())
    }

    pub fn ids(&self) -> Vec<String> {
        self.records().map(|r| r.id.clone()).collect()
    }

    /// Empty cells after the last day to complete the final grid row.
    pub fn trailing_blank_count(&self) -> usize {
        (7 - (self.leading_blank_count + self.month_days.len()) % 7) % 7
    }
}

/// Bucket `records` into the Monday-first week that contains `today`.
///
/// Records outside `[week_start, week_start + 6]` are left out.
pub fn bucket_week<'a, Tz: TimeZone>(
    today: NaiveDate,
    records: &'a [InterviewRecord],
    tz: &Tz,
) -> WeekBuckets<'a> {
    let week_start = start_of_week(today);
    let week_days: [NaiveDate; 7] =
        std::array::from_fn(|offset| week_start + Duration::days(offset as i64));

    let mut buckets: BTreeMap<usize, Vec<&InterviewRecord>> = BTreeMap::new();
    for record in records {
        let day = record.local_date(tz);
        if let Some(index) = week_days.iter().position(|d| *d == day) {
            buckets.entry(index).or_default().push(record);
        }
    }
    sort_buckets(buckets.values_mut());

    WeekBuckets { week_days, buckets }
}

/// Bucket `records` into the days of `month`.
pub fn bucket_month<'a, Tz: TimeZone>(
    month: YearMonth,
    records: &'a [InterviewRecord],
    tz: &Tz,
) -> MonthBuckets<'a> {
    let first = month.first_day();
    let month_days: Vec<NaiveDate> = first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .collect();
    let leading_blank_count = first.weekday().num_days_from_sunday() as usize;

    let mut buckets: BTreeMap<NaiveDate, Vec<&InterviewRecord>> = BTreeMap::new();
    for record in records {
        let day = record.local_date(tz);
        if day.year() == first.year() && day.month() == first.month() {
            buckets.entry(day).or_default().push(record);
        }
    }
    sort_buckets(buckets.values_mut());

    MonthBuckets {
        month,
        month_days,
        buckets,
        leading_blank_count,
    }
}

/// Earliest first. `sort_by_key` is stable, so identical timestamps keep
/// their input order.
fn sort_buckets<'b, 'a: 'b>(buckets: impl Iterator<Item = &'b mut Vec<&'a InterviewRecord>>) {
    for bucket in buckets {
        bucket.sort_by_key(|r| r.scheduled_at);
    }
}
