use chrono::{NaiveDate, TimeZone};
use colored::{ColoredString, Colorize};

use crate::calendar::bucket::{MonthBuckets, WeekBuckets};
use crate::handshake::HandshakePhase;
use crate::models::{InterviewRecord, InterviewStatus, JobSummary};
use crate::notice::{Notice, NoticeLevel};
use crate::scheduling::form::ValidationErrors;
use crate::scheduling::ScheduleOutcome;
use crate::viewer::{DetailLookup, DetailViewer};

const WEEKDAY_HEADER: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const MONTH_CELL_WIDTH: usize = 5;

/// Format one interview as a single agenda line.
pub fn format_interview_row<Tz: TimeZone>(record: &InterviewRecord, tz: &Tz) -> String {
    let time = record
        .scheduled_at
        .with_timezone(tz)
        .naive_local()
        .format("%H:%M")
        .to_string();
    let id = short_id(&record.id).dimmed().to_string();
    let name = if record.candidate_name.is_empty() {
        "(unnamed candidate)".to_string()
    } else {
        record.candidate_name.clone()
    };

    format!(
        "{} {} {} {} {}",
        time,
        id,
        name.bold(),
        record.interview_type.as_str().dimmed(),
        status_label(record.status)
    )
}

/// Format the weekly view: seven day sections, Monday first.
pub fn format_week<Tz: TimeZone>(week: &WeekBuckets<'_>, label: &str, today: NaiveDate, tz: &Tz) -> String {
    let mut lines = vec![label.bold().to_string(), "─".repeat(label.chars().count())];

    for (index, day) in week.week_days.iter().enumerate() {
        lines.push(day_heading(*day, today));
        let records = week.day(index);
        if records.is_empty() {
            lines.push(format!("  {}", "-".dimmed()));
        }
        for record in records {
            lines.push(format!("  {}", format_interview_row(record, tz)));
        }
    }

    lines.join("\n")
}

/// Format the monthly view: a Sunday-first grid followed by the populated days.
pub fn format_month<Tz: TimeZone>(month: &MonthBuckets<'_>, label: &str, today: NaiveDate, tz: &Tz) -> String {
    let mut lines = vec![label.bold().to_string(), "─".repeat(label.chars().count())];

    lines.push(
        WEEKDAY_HEADER
            .iter()
            .map(|d| format!("{:<width$}", d, width = MONTH_CELL_WIDTH))
            .collect::<String>()
            .trim_end()
            .dimmed()
            .to_string(),
    );

    let mut cells: Vec<String> = vec![" ".repeat(MONTH_CELL_WIDTH); month.leading_blank_count];
    for day in &month.month_days {
        cells.push(month_cell(*day, month.day(day).len(), today));
    }
    for week in cells.chunks(7) {
        lines.push(week.concat().trim_end().to_string());
    }

    for (day, records) in &month.buckets {
        lines.push(String::new());
        lines.push(day_heading(*day, today));
        for record in records {
            lines.push(format!("  {}", format_interview_row(record, tz)));
        }
    }

    lines.join("\n")
}

/// Format the detail viewer for whatever it currently points at.
pub fn format_detail<Tz: TimeZone>(viewer: &DetailViewer, records: &[InterviewRecord], tz: &Tz) -> String {
    match viewer.resolve(records) {
        DetailLookup::Closed => "No interview open.".dimmed().to_string(),
        DetailLookup::NotFound(id) => format!(
            "{} Interview {} was not found. It may have been cancelled or removed.",
            "?".yellow().bold(),
            id
        ),
        DetailLookup::Found(record) => format_interview_detail(record, viewer, tz),
    }
}

fn format_interview_detail<Tz: TimeZone>(record: &InterviewRecord, viewer: &DetailViewer, tz: &Tz) -> String {
    let mut lines = Vec::new();

    let title = if record.candidate_name.is_empty() {
        "(unnamed candidate)"
    } else {
        record.candidate_name.as_str()
    };
    lines.push(title.bold().to_string());
    lines.push("─".repeat(title.chars().count()));

    if let Some((position, total)) = viewer.position() {
        let prev = if viewer.has_prev() { "‹ prev" } else { "      " };
        let next = if viewer.has_next() { "next ›" } else { "" };
        lines.push(
            format!("{}  {} of {}  {}", prev, position, total, next)
                .trim_end()
                .dimmed()
                .to_string(),
        );
    }

    let when = record.scheduled_at.with_timezone(tz).naive_local();
    lines.push(format!("{}       {}", "ID:".dimmed(), record.id));
    lines.push(format!("{}     {}", "When:".dimmed(), when.format("%a %Y-%m-%d %H:%M")));
    lines.push(format!("{} {} min", "Duration:".dimmed(), record.duration));
    lines.push(format!("{}     {}", "Type:".dimmed(), record.interview_type));
    lines.push(format!("{}   {}", "Status:".dimmed(), status_label(record.status)));
    if !record.job_title.is_empty() {
        lines.push(format!("{}      {}", "Job:".dimmed(), record.job_title));
    }
    if !record.candidate_email.is_empty() {
        lines.push(format!("{}    {}", "Email:".dimmed(), record.candidate_email));
    }
    match &record.meeting_link {
        Some(link) => lines.push(format!("{}     {}", "Link:".dimmed(), link.underline())),
        None => lines.push(format!("{}     {}", "Link:".dimmed(), "(none)".dimmed())),
    }

    if let Some(notes) = record.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        lines.push(String::new());
        lines.push("Notes:".dimmed().to_string());
        for line in notes.lines() {
            lines.push(format!("  {}", line));
        }
    }

    if record.status == InterviewStatus::Completed {
        lines.push(String::new());
        lines.push("Feedback:".dimmed().to_string());
        match (record.rating, record.feedback.as_deref()) {
            (Some(rating), Some(feedback)) if record.has_feedback() => {
                lines.push(format!("  {} ({}/5)", stars(rating).yellow(), rating));
                for line in feedback.lines() {
                    lines.push(format!("  {}", line));
                }
            }
            _ => lines.push(format!(
                "  {}",
                "Not submitted yet. Rate 1-5 and add written feedback.".italic()
            )),
        }
    }

    lines.join("\n")
}

pub fn format_job_row(job: &JobSummary) -> String {
    format!("{} {}", job.id.dimmed(), job.title.bold())
}

pub fn format_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Success => "✓".green().bold(),
        NoticeLevel::Info => "i".cyan().bold(),
        NoticeLevel::Error => "✗".red().bold(),
    };
    format!("{} {}", marker, notice.message)
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut lines = vec!["Please fix the following:".red().bold().to_string()];
    for error in &errors.errors {
        lines.push(format!("  {} {}: {}", "•".dimmed(), error.field.label().bold(), error.message));
    }
    lines.join("\n")
}

pub fn format_connection(phase: HandshakePhase) -> String {
    let label = match phase {
        HandshakePhase::Connected => "connected".green(),
        HandshakePhase::Disconnected => "not connected".yellow(),
        HandshakePhase::Pending => "waiting for consent".cyan(),
        HandshakePhase::Unknown => "unknown".dimmed(),
    };
    format!("{} {}", "Calendar:".dimmed(), label)
}

pub fn format_schedule_outcome<Tz: TimeZone>(outcome: &ScheduleOutcome, tz: &Tz) -> String {
    let when = outcome.scheduled_at.with_timezone(tz).naive_local().format("%a %Y-%m-%d %H:%M");
    let mut lines = vec![format!(
        "{} Scheduled interview {} for {}",
        "✓".green().bold(),
        outcome.id.bold(),
        when
    )];
    if let Some(link) = &outcome.meeting_link {
        lines.push(format!("  {} {}", "Link:".dimmed(), link.underline()));
    }
    lines.join("\n")
}

fn day_heading(day: NaiveDate, today: NaiveDate) -> String {
    let heading = day.format("%a %d %b").to_string();
    if day == today {
        format!("{} {}", heading.bold().cyan(), "(today)".dimmed())
    } else {
        heading.bold().to_string()
    }
}

fn month_cell(day: NaiveDate, count: usize, today: NaiveDate) -> String {
    let marker = match count {
        0 => String::new(),
        1..=9 => format!("•{}", count),
        _ => "•+".to_string(),
    };
    let text = format!("{:>2}{:<width$}", day.format("%-d").to_string(), marker, width = MONTH_CELL_WIDTH - 2);
    if day == today {
        text.cyan().bold().to_string()
    } else if count > 0 {
        text.bold().to_string()
    } else {
        text
    }
}

fn status_label(status: InterviewStatus) -> ColoredString {
    match status {
        InterviewStatus::Scheduled => status.as_str().blue(),
        InterviewStatus::InProgress => status.as_str().yellow(),
        InterviewStatus::Completed => status.as_str().green(),
        InterviewStatus::Cancelled => status.as_str().red().strikethrough(),
    }
}

fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::bucket::tests::record;
    use crate::calendar::bucket::{bucket_month, bucket_week};
    use crate::models::YearMonth;
    use chrono::{FixedOffset, Utc};
    use chrono_tz::America::New_York;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn strip(s: &str) -> String {
        strip_ansi_escapes::strip_str(s)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn format_interview_row_shows_local_time() {
        let r = record("abcdef123456", Utc.with_ymd_and_hms(2026, 2, 16, 23, 30, 0).unwrap());
        let plus_2 = FixedOffset::east_opt(2 * 3600).unwrap();
        let output = strip(&format_interview_row(&r, &plus_2));
        assert!(output.starts_with("01:30 abcdef12 "), "got: {}", output);
        assert!(output.contains("Candidate abcdef123456"));
        assert!(output.contains("scheduled"));
    }

    #[test]
    fn format_interview_row_uses_offset_of_each_instant() {
        let summer = record("summer", Utc.with_ymd_and_hms(2026, 10, 16, 13, 0, 0).unwrap());
        let winter = record("winter", Utc.with_ymd_and_hms(2026, 12, 1, 14, 0, 0).unwrap());
        assert!(strip(&format_interview_row(&summer, &New_York)).starts_with("09:00 "));
        assert!(strip(&format_interview_row(&winter, &New_York)).starts_with("09:00 "));
    }

    #[test]
    fn format_week_lists_all_seven_days() {
        let records = vec![record("mon", Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap())];
        let week = bucket_week(date(2026, 2, 18), &records, &utc());
        let output = strip(&format_week(&week, "Week of 2026-02-16", date(2026, 2, 18), &utc()));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Week of 2026-02-16");
        assert_eq!(lines[2], "Mon 16 Feb");
        assert!(lines[3].contains("Candidate mon"));
        assert!(output.contains("Wed 18 Feb (today)"));
        assert!(output.contains("Sun 22 Feb"));
    }

    #[test]
    fn format_month_grid_for_february_2026_starts_in_first_column() {
        let records = vec![
            record("a", Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap()),
            record("b", Utc.with_ymd_and_hms(2026, 2, 16, 11, 0, 0).unwrap()),
        ];
        let month = bucket_month(YearMonth::new(2026, 2).unwrap(), &records, &utc());
        let output = strip(&format_month(&month, "February 2026", date(2026, 3, 1), &utc()));
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[2].starts_with("Su"));
        assert!(lines[3].starts_with(" 1 "), "first week row: {:?}", lines[3]);
        // 28 days starting on Sunday fill exactly four rows.
        assert!(lines[6].trim_start().starts_with("22"));
        assert!(output.contains("16•2"));
        assert!(output.contains("Mon 16 Feb"));
    }

    #[test]
    fn format_month_pads_leading_blanks() {
        // March 2026 starts on a Sunday as well; April 2026 starts on a Wednesday.
        let month = bucket_month(YearMonth::new(2026, 4).unwrap(), &[], &utc());
        let output = strip(&format_month(&month, "April 2026", date(2026, 1, 1), &utc()));
        let first_row = output.lines().nth(3).unwrap();
        assert_eq!(first_row.find('1'), Some(3 * MONTH_CELL_WIDTH + 1));
    }

    #[test]
    fn format_detail_states() {
        let mut completed = record("done", Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap());
        completed.status = InterviewStatus::Completed;
        let records = vec![completed.clone()];

        let mut viewer = DetailViewer::new();
        assert!(strip(&format_detail(&viewer, &records, &utc())).contains("No interview open"));

        viewer.open("done", vec!["done".to_string(), "gone".to_string()]);
        let output = strip(&format_detail(&viewer, &records, &utc()));
        assert!(output.contains("1 of 2"));
        assert!(output.contains("next ›"));
        assert!(output.contains("Not submitted yet"));

        viewer.navigate_next();
        let output = strip(&format_detail(&viewer, &records, &utc()));
        assert!(output.contains("Interview gone was not found"));
    }

    #[test]
    fn format_detail_shows_submitted_feedback() {
        let mut completed = record("done", Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap());
        completed.status = InterviewStatus::Completed;
        completed.rating = Some(4);
        completed.feedback = Some("Clear communicator".to_string());
        let records = vec![completed];
        let mut viewer = DetailViewer::new();
        viewer.open("done", Vec::new());
        let output = strip(&format_detail(&viewer, &records, &utc()));
        assert!(output.contains("★★★★☆ (4/5)"));
        assert!(output.contains("Clear communicator"));
        assert!(!output.contains("Not submitted yet"));
    }

    #[test]
    fn format_detail_without_feedback_section_for_scheduled() {
        let records = vec![record("s", Utc.with_ymd_and_hms(2026, 2, 16, 9, 0, 0).unwrap())];
        let mut viewer = DetailViewer::new();
        viewer.open("s", vec!["s".to_string()]);
        let output = strip(&format_detail(&viewer, &records, &utc()));
        assert!(!output.contains("Feedback:"));
        assert!(output.contains("(none)"));
    }

    #[test]
    fn format_notice_markers() {
        assert_eq!(strip(&format_notice(&Notice::success("Done"))), "✓ Done");
        assert_eq!(strip(&format_notice(&Notice::error("Nope"))), "✗ Nope");
        assert_eq!(strip(&format_notice(&Notice::info("FYI"))), "i FYI");
    }
}
