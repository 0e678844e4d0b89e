use chrono::{Duration, NaiveDate, TimeZone};
use serde::Serialize;

use super::bucket::{bucket_month, bucket_week};
use super::dates::start_of_week;
use crate::models::{InterviewRecord, YearMonth};

/// Which window the calendar is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[value(name = "week", alias = "weekly")]
    Weekly,
    #[value(name = "month", alias = "monthly")]
    Monthly,
}

/// The displayed time window.
///
/// `week_start` and `month` are both kept across mode switches, so toggling
/// back to a view restores the position it had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationCursor {
    view_mode: ViewMode,
    /// Monday of the displayed week.
    week_start: NaiveDate,
    month: YearMonth,
}

impl NavigationCursor {
    /// A weekly cursor positioned on the week and month containing `today`.
    pub fn new(today: NaiveDate) -> Self {
        NavigationCursor {
            view_mode: ViewMode::Weekly,
            week_start: start_of_week(today),
            month: YearMonth::of(today),
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn step_forward(&mut self) {
        self.step(1);
    }

    pub fn step_back(&mut self) {
        self.step(-1);
    }

    /// Move `delta` weeks or months, depending on the active view.
    pub fn step(&mut self, delta: i32) {
        match self.view_mode {
            ViewMode::Weekly => {
                if let Some(week_start) = Duration::try_weeks(delta as i64)
                    .and_then(|shift| self.week_start.checked_add_signed(shift))
                {
                    self.week_start = week_start;
                }
            }
            ViewMode::Monthly => {
                if let Some(month) = self.month.add_months(delta) {
                    self.month = month;
                }
            }
        }
    }

    /// Re-anchor the active view on `today`. The inactive position is kept.
    pub fn snap_to_today(&mut self, today: NaiveDate) {
        match self.view_mode {
            ViewMode::Weekly => self.week_start = start_of_week(today),
            ViewMode::Monthly => self.month = YearMonth::of(today),
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn label(&self) -> String {
        match self.view_mode {
            ViewMode::Weekly => format!("Week of {}", self.week_start.format("%Y-%m-%d")),
            ViewMode::Monthly => self.month.first_day().format("%B %Y").to_string(),
        }
    }

    /// Ids of the records visible in the active view, in display order.
    ///
    /// This is the scope handed to the detail viewer when an item is opened.
    pub fn visible_ids<Tz: TimeZone>(&self, records: &[InterviewRecord], tz: &Tz) -> Vec<String> {
        match self.view_mode {
            ViewMode::Weekly => bucket_week(self.week_start, records, tz).ids(),
            ViewMode::Monthly => bucket_month(self.month, records, tz).ids(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::bucket::tests::record;
    use chrono::{FixedOffset, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_starts_weekly_on_monday() {
        let cursor = NavigationCursor::new(date(2026, 2, 18));
        assert_eq!(cursor.view_mode(), ViewMode::Weekly);
        assert_eq!(cursor.week_start(), date(2026, 2, 16));
        assert_eq!(cursor.month(), YearMonth::new(2026, 2).unwrap());
    }

    #[test]
    fn test_weekly_steps_are_seven_days() {
        let mut cursor = NavigationCursor::new(date(2026, 2, 18));
        cursor.step_forward();
        assert_eq!(cursor.week_start(), date(2026, 2, 23));
        cursor.step_back();
        cursor.step_back();
        assert_eq!(cursor.week_start(), date(2026, 2, 9));
        // Month is untouched by weekly steps.
        assert_eq!(cursor.month(), YearMonth::new(2026, 2).unwrap());
    }

    #[test]
    fn test_monthly_steps_cross_year_boundaries() {
        let mut cursor = NavigationCursor::new(date(2026, 1, 31));
        cursor.set_view_mode(ViewMode::Monthly);
        cursor.step_back();
        assert_eq!(cursor.month(), YearMonth::new(2025, 12).unwrap());
        cursor.step_forward();
        cursor.step_forward();
        assert_eq!(cursor.month(), YearMonth::new(2026, 2).unwrap());
    }

    #[test]
    fn test_huge_steps_leave_cursor_unchanged() {
        let mut cursor = NavigationCursor::new(date(2026, 2, 18));
        let original = cursor.clone();
        cursor.step(i32::MAX);
        cursor.step(i32::MIN);
        assert_eq!(cursor, original);

        cursor.set_view_mode(ViewMode::Monthly);
        let original = cursor.clone();
        cursor.step(i32::MAX);
        cursor.step(i32::MIN);
        assert_eq!(cursor, original);
    }

    #[test]
    fn test_round_trip_has_no_drift() {
        let mut cursor = NavigationCursor::new(date(2026, 1, 31));
        let original = cursor.clone();
        for _ in 0..30 {
            cursor.step_forward();
        }
        for _ in 0..30 {
            cursor.step_back();
        }
        assert_eq!(cursor, original);

        cursor.set_view_mode(ViewMode::Monthly);
        let original = cursor.clone();
        for _ in 0..25 {
            cursor.step_forward();
            cursor.step_back();
        }
        for _ in 0..13 {
            cursor.step_forward();
        }
        for _ in 0..13 {
            cursor.step_back();
        }
        assert_eq!(cursor, original);
    }

    #[test]
    fn test_set_view_mode_preserves_positions() {
        let mut cursor = NavigationCursor::new(date(2026, 2, 18));
        cursor.step_forward(); // week of Feb 23
        cursor.set_view_mode(ViewMode::Monthly);
        cursor.step_forward(); // March
        cursor.set_view_mode(ViewMode::Weekly);
        assert_eq!(cursor.week_start(), date(2026, 2, 23));
        cursor.set_view_mode(ViewMode::Monthly);
        assert_eq!(cursor.month(), YearMonth::new(2026, 3).unwrap());
    }

    #[test]
    fn test_snap_to_today_only_moves_active_view() {
        let mut cursor = NavigationCursor::new(date(2026, 2, 18));
        cursor.step_forward();
        cursor.set_view_mode(ViewMode::Monthly);
        cursor.step_forward();
        cursor.step_forward();

        cursor.snap_to_today(date(2026, 2, 18));
        assert_eq!(cursor.month(), YearMonth::new(2026, 2).unwrap());
        assert_eq!(cursor.week_start(), date(2026, 2, 23));

        cursor.set_view_mode(ViewMode::Weekly);
        cursor.snap_to_today(date(2026, 2, 22));
        assert_eq!(cursor.week_start(), date(2026, 2, 16));
    }

    #[test]
    fn test_labels() {
        let mut cursor = NavigationCursor::new(date(2026, 2, 18));
        assert_eq!(cursor.label(), "Week of 2026-02-16");
        cursor.set_view_mode(ViewMode::Monthly);
        assert_eq!(cursor.label(), "February 2026");
    }

    #[test]
    fn test_visible_ids_follow_active_view() {
        let records = vec![
            record("this-week", Utc.with_ymd_and_hms(2026, 2, 17, 9, 0, 0).unwrap()),
            record("later-in-month", Utc.with_ymd_and_hms(2026, 2, 26, 9, 0, 0).unwrap()),
        ];
        let tz = FixedOffset::east_opt(0).unwrap();
        let mut cursor = NavigationCursor::new(date(2026, 2, 18));
        assert_eq!(cursor.visible_ids(&records, &tz), vec!["this-week"]);
        cursor.set_view_mode(ViewMode::Monthly);
        assert_eq!(
            cursor.visible_ids(&records, &tz),
            vec!["this-week", "later-in-month"]
        );
    }
}
