use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::bucket::{MonthBuckets, WeekBuckets};
use crate::models::{InterviewRecord, YearMonth};
use crate::viewer::{DetailLookup, DetailViewer};

/// Serialize any serializable value to pretty JSON string.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[derive(Debug, Serialize)]
pub struct DayJson<'a> {
    pub date: NaiveDate,
    pub interviews: Vec<&'a InterviewRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekJson<'a> {
    pub label: String,
    pub week_start: NaiveDate,
    /// Always seven entries, Monday first.
    pub days: Vec<DayJson<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthJson<'a> {
    pub label: String,
    pub month: YearMonth,
    pub leading_blank_count: usize,
    pub days_in_month: usize,
    /// Only days with at least one interview.
    pub days: Vec<DayJson<'a>>,
}

/// JSON form of the detail viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailJson<'a> {
    /// `closed`, `not_found` or `found`.
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    pub scoped_ids: &'a [String],
    pub has_prev: bool,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview: Option<&'a InterviewRecord>,
}

pub fn format_week(week: &WeekBuckets<'_>, label: &str) -> String {
    let days = week
        .week_days
        .iter()
        .enumerate()
        .map(|(index, date)| DayJson {
            date: *date,
            interviews: week.day(index).to_vec(),
        })
        .collect();
    to_json(&WeekJson {
        label: label.to_string(),
        week_start: week.week_start(),
        days,
    })
}

pub fn format_month(month: &MonthBuckets<'_>, label: &str) -> String {
    let days = month
        .buckets
        .iter()
        .map(|(date, records)| DayJson {
            date: *date,
            interviews: records.clone(),
        })
        .collect();
    to_json(&MonthJson {
        label: label.to_string(),
        month: month.month,
        leading_blank_count: month.leading_blank_count,
        days_in_month: month.month_days.len(),
        days,
    })
}

pub fn format_detail(viewer: &DetailViewer, records: &[InterviewRecord]) -> String {
    let (state, interview) = match viewer.resolve(records) {
        DetailLookup::Closed => ("closed", None),
        DetailLookup::NotFound(_) => ("not_found", None),
        DetailLookup::Found(record) => ("found", Some(record)),
    };
    to_json(&DetailJson {
        state,
        id: viewer.current_id(),
        position: viewer.position().map(|(position, _)| position),
        scoped_ids: viewer.scoped_ids(),
        has_prev: viewer.has_prev(),
        has_next: viewer.has_next(),
        interview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::bucket::tests::record;
    use crate::calendar::bucket::{bucket_month, bucket_week};
    use chrono::{FixedOffset, TimeZone, Utc};
    use serde_json::Value;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn week_json_has_seven_days() {
        let records = vec![record("mon", Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap())];
        let week = bucket_week(NaiveDate::from_ymd_opt(2026, 2, 18).unwrap(), &records, &utc());
        let json: Value = serde_json::from_str(&format_week(&week, "Week of 2026-02-16")).unwrap();
        assert_eq!(json["weekStart"], "2026-02-16");
        assert_eq!(json["days"].as_array().unwrap().len(), 7);
        assert_eq!(json["days"][0]["interviews"][0]["id"], "mon");
        assert_eq!(json["days"][6]["date"], "2026-02-22");
    }

    #[test]
    fn month_json_reports_padding() {
        let month = bucket_month(YearMonth::new(2026, 2).unwrap(), &[], &utc());
        let json: Value = serde_json::from_str(&format_month(&month, "February 2026")).unwrap();
        assert_eq!(json["month"], "2026-02");
        assert_eq!(json["leadingBlankCount"], 0);
        assert_eq!(json["daysInMonth"], 28);
        assert!(json["days"].as_array().unwrap().is_empty());
    }

    #[test]
    fn detail_json_not_found() {
        let mut viewer = DetailViewer::new();
        viewer.open("gone", vec!["gone".to_string()]);
        let json: Value = serde_json::from_str(&format_detail(&viewer, &[])).unwrap();
        assert_eq!(json["state"], "not_found");
        assert_eq!(json["id"], "gone");
        assert_eq!(json["position"], 1);
        assert!(json.get("interview").is_none());
    }
}
