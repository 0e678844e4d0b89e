use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// The calendar date of `now` in the user's time zone.
pub fn local_today<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    now.with_timezone(tz).date_naive()
}

/// The Monday of the week containing `date`.
///
/// Sunday counts as the last day of the week (offset 6), every other day
/// shifts back by `weekday - 1`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let days_since_monday = date.weekday().num_days_from_monday();
    date - Duration::days(days_since_monday as i64)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse an `HH:MM` time of day (24h). Seconds are always zero.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// Combine a local calendar date and time of day into an absolute instant.
///
/// The offset is the one `tz` uses on that date, not today's. A wall-clock
/// time that happens twice (clocks going back) takes the first occurrence;
/// one skipped by a forward jump gives `None`. Seconds are zero.
pub fn compose_local<Tz: TimeZone>(date: NaiveDate, time: NaiveTime, tz: &Tz) -> Option<DateTime<Utc>> {
    let local_dt = tz.from_local_datetime(&date.and_time(time)).earliest()?;
    Some(local_dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Weekday};
    use chrono_tz::America::New_York;

    fn utc_tz() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_of_week_midweek() {
        // Wednesday Feb 18 2026 -> Monday Feb 16
        assert_eq!(start_of_week(date(2026, 2, 18)), date(2026, 2, 16));
    }

    #[test]
    fn test_start_of_week_sunday_belongs_to_previous_monday() {
        // Sunday Feb 22 2026 -> Monday Feb 16, not Feb 23
        assert_eq!(start_of_week(date(2026, 2, 22)), date(2026, 2, 16));
    }

    #[test]
    fn test_start_of_week_monday_is_fixed_point() {
        assert_eq!(start_of_week(date(2026, 2, 16)), date(2026, 2, 16));
    }

    #[test]
    fn test_start_of_week_always_monday_across_a_year() {
        let mut d = date(2025, 12, 1);
        while d < date(2027, 1, 31) {
            assert_eq!(start_of_week(d).weekday(), Weekday::Mon, "for {}", d);
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_local_today_utc_minus_5_is_previous_day() {
        // At UTC 2am on Jan 22, local time in UTC-5 is Jan 21 at 9pm
        let utc_minus_5 = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 22, 2, 0, 0).unwrap();
        assert_eq!(local_today(now, &utc_minus_5), date(2026, 1, 21));
    }

    #[test]
    fn test_parse_time() {
        let t = parse_time("09:30").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (9, 30, 0));
        assert!(parse_time("").is_none());
        assert!(parse_time("25:00").is_none());
        assert!(parse_time("9am").is_none());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-02-18"), Some(date(2026, 2, 18)));
        assert!(parse_date("2026-02-30").is_none());
        assert!(parse_date("not-a-date").is_none());
    }

    #[test]
    fn test_compose_local_converts_to_utc() {
        // 09:00 in UTC+2 is 07:00 UTC
        let plus_2 = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = compose_local(date(2026, 3, 4), parse_time("09:00").unwrap(), &plus_2).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 4, 7, 0, 0).unwrap());
        assert_eq!(dt.nanosecond(), 0);
    }

    #[test]
    fn test_compose_local_utc() {
        let dt = compose_local(date(2026, 3, 4), parse_time("14:45").unwrap(), &utc_tz()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 4, 14, 45, 0).unwrap());
    }

    #[test]
    fn test_compose_local_uses_offset_of_target_date() {
        // October is EDT (UTC-4), December is EST (UTC-5).
        let nine = parse_time("09:00").unwrap();
        let october = compose_local(date(2026, 10, 16), nine, &New_York).unwrap();
        assert_eq!(october, Utc.with_ymd_and_hms(2026, 10, 16, 13, 0, 0).unwrap());
        let december = compose_local(date(2026, 12, 1), nine, &New_York).unwrap();
        assert_eq!(december, Utc.with_ymd_and_hms(2026, 12, 1, 14, 0, 0).unwrap());
        assert_eq!(december.with_timezone(&New_York).hour(), 9);
    }

    #[test]
    fn test_compose_local_repeated_time_takes_first() {
        // 01:30 happens twice on 2026-11-01; the first is still EDT.
        let dt = compose_local(date(2026, 11, 1), parse_time("01:30").unwrap(), &New_York).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_compose_local_skipped_time_is_none() {
        // Clocks jump from 02:00 to 03:00 on 2026-03-08.
        assert!(compose_local(date(2026, 3, 8), parse_time("02:30").unwrap(), &New_York).is_none());
    }

    #[test]
    fn test_local_today_follows_dst() {
        // 03:30 UTC is still the previous evening in New York, winter or summer.
        let summer = Utc.with_ymd_and_hms(2026, 7, 2, 3, 30, 0).unwrap();
        assert_eq!(local_today(summer, &New_York), date(2026, 7, 1));
        let winter = Utc.with_ymd_and_hms(2026, 12, 2, 3, 30, 0).unwrap();
        assert_eq!(local_today(winter, &New_York), date(2026, 12, 1));
    }
}
