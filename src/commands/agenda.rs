use anyhow::{anyhow, Context, Result};
use chrono::TimeZone;

use crate::api::InterviewService;
use crate::calendar::bucket::{bucket_month, bucket_week};
use crate::calendar::cursor::{NavigationCursor, ViewMode};
use crate::calendar::dates::parse_date;
use crate::cli::context::RunContext;
use crate::models::YearMonth;
use crate::output::format::OutputMode;

pub fn week<S: InterviewService + ?Sized, Tz: TimeZone>(
    service: &S,
    date: Option<&str>,
    offset: i32,
    ctx: &RunContext<Tz>,
) -> Result<()> {
    let anchor = match date {
        Some(s) => parse_date(s).ok_or_else(|| anyhow!("Invalid date '{}': expected YYYY-MM-DD", s))?,
        None => ctx.today(),
    };
    let mut cursor = NavigationCursor::new(anchor);
    cursor.step(offset);

    let records = service.list_interviews().context("Failed to load interviews")?;
    let week = bucket_week(cursor.week_start(), &records, &ctx.tz);
    let label = cursor.label();

    match ctx.output_mode {
        OutputMode::Json => {
            println!("{}", crate::output::json::format_week(&week, &label));
        }
        OutputMode::Tty => {
            println!(
                "{}",
                crate::output::table::format_week(&week, &label, ctx.today(), &ctx.tz)
            );
        }
    }

    Ok(())
}

pub fn month<S: InterviewService + ?Sized, Tz: TimeZone>(
    service: &S,
    month: Option<YearMonth>,
    offset: i32,
    ctx: &RunContext<Tz>,
) -> Result<()> {
    let anchor = month.map(YearMonth::first_day).unwrap_or_else(|| ctx.today());
    let mut cursor = NavigationCursor::new(anchor);
    cursor.set_view_mode(ViewMode::Monthly);
    cursor.step(offset);

    let records = service.list_interviews().context("Failed to load interviews")?;
    let buckets = bucket_month(cursor.month(), &records, &ctx.tz);
    let label = cursor.label();

    match ctx.output_mode {
        OutputMode::Json => {
            println!("{}", crate::output::json::format_month(&buckets, &label));
        }
        OutputMode::Tty => {
            println!(
                "{}",
                crate::output::table::format_month(&buckets, &label, ctx.today(), &ctx.tz)
            );
        }
    }

    Ok(())
}
