use anyhow::{Context, Result};
use chrono::TimeZone;

use crate::api::InterviewService;
use crate::calendar::cursor::{NavigationCursor, ViewMode};
use crate::cli::context::RunContext;
use crate::output::format::OutputMode;
use crate::viewer::DetailViewer;

/// Show one interview, scoped to the week or month that contains it.
///
/// An unknown id renders the not-found state rather than failing.
pub fn show<S: InterviewService + ?Sized, Tz: TimeZone>(
    service: &S,
    id: &str,
    scope: ViewMode,
    ctx: &RunContext<Tz>,
) -> Result<()> {
    let records = service.list_interviews().context("Failed to load interviews")?;

    let scoped_ids = match records.iter().find(|r| r.id == id) {
        Some(record) => {
            let mut cursor = NavigationCursor::new(record.local_date(&ctx.tz));
            cursor.set_view_mode(scope);
            cursor.visible_ids(&records, &ctx.tz)
        }
        None => Vec::new(),
    };

    let mut viewer = DetailViewer::new();
    viewer.open(id, scoped_ids);

    match ctx.output_mode {
        OutputMode::Json => {
            println!("{}", crate::output::json::format_detail(&viewer, &records));
        }
        OutputMode::Tty => {
            println!(
                "{}",
                crate::output::table::format_detail(&viewer, &records, &ctx.tz)
            );
        }
    }

    Ok(())
}
