use anyhow::{anyhow, bail, Context, Result};
use chrono::TimeZone;
use log::debug;
use serde::Serialize;

use crate::api::{CalendarService, InterviewService};
use crate::cli::context::RunContext;
use crate::handshake::ConnectionStatus;
use crate::notice::Notice;
use crate::output::format::OutputMode;
use crate::scheduling::flow::{self, find_interview};
use crate::scheduling::{CancelOutcome, ScheduleForm, SchedulingError};
use crate::viewer::DetailViewer;

pub fn schedule<S: InterviewService + CalendarService + ?Sized, Tz: TimeZone>(
    service: &S,
    form: &ScheduleForm,
    ctx: &RunContext<Tz>,
) -> Result<()> {
    let outcome = match flow::schedule(service, form, ctx.today(), &ctx.tz) {
        Ok(outcome) => outcome,
        Err(SchedulingError::Invalid(errors)) => {
            match ctx.output_mode {
                OutputMode::Json => println!("{}", crate::output::json::to_json(&errors)),
                OutputMode::Tty => eprintln!("{}", crate::output::table::format_validation_errors(&errors)),
            }
            bail!("Interview not scheduled: {} invalid field(s)", errors.errors.len());
        }
        Err(e) => return Err(fail(e)),
    };

    let link_notice = if outcome.meeting_link.is_none() {
        // Only asked when it changes what we tell the user.
        let status = match service.check_connection() {
            Ok(true) => ConnectionStatus::Connected,
            Ok(false) => ConnectionStatus::Disconnected,
            Err(e) => {
                debug!("calendar status check failed: {}", e);
                ConnectionStatus::Unknown
            }
        };
        outcome.link_notice(status)
    } else {
        None
    };

    match ctx.output_mode {
        OutputMode::Json => {
            println!("{}", crate::output::json::to_json(&outcome));
        }
        OutputMode::Tty => {
            println!(
                "{}",
                crate::output::table::format_schedule_outcome(&outcome, &ctx.tz)
            );
            if let Some(notice) = &link_notice {
                println!("{}", crate::output::table::format_notice(notice));
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct CancelJson<'a> {
    id: &'a str,
    result: CancelOutcome,
}

pub fn cancel<S: InterviewService + ?Sized, Tz: TimeZone>(service: &S, id: &str, ctx: &RunContext<Tz>) -> Result<()> {
    let records = service.list_interviews().context("Failed to load interviews")?;
    let record = find_interview(&records, id).map_err(fail)?;
    let outcome = flow::cancel(service, record).map_err(fail)?;

    match ctx.output_mode {
        OutputMode::Json => {
            println!("{}", crate::output::json::to_json(&CancelJson { id, result: outcome }));
        }
        OutputMode::Tty => {
            let notice = match outcome {
                CancelOutcome::Cancelled => Notice::success(format!("Cancelled interview {}", id)),
                CancelOutcome::AlreadyCancelled => {
                    Notice::info(format!("Interview {} was already cancelled", id))
                }
            };
            println!("{}", crate::output::table::format_notice(&notice));
        }
    }

    Ok(())
}

pub fn feedback<S: InterviewService + ?Sized, Tz: TimeZone>(
    service: &S,
    id: &str,
    rating: u8,
    text: &str,
    ctx: &RunContext<Tz>,
) -> Result<()> {
    let records = service.list_interviews().context("Failed to load interviews")?;
    let record = find_interview(&records, id).map_err(fail)?;
    let updated = flow::submit_feedback(service, record, rating, text).map_err(fail)?;

    match ctx.output_mode {
        OutputMode::Json => {
            println!("{}", crate::output::json::to_json(&updated));
        }
        OutputMode::Tty => {
            let mut viewer = DetailViewer::new();
            viewer.open(updated.id.clone(), Vec::new());
            println!(
                "{}",
                crate::output::table::format_detail(&viewer, std::slice::from_ref(&updated), &ctx.tz)
            );
            println!();
            println!(
                "{}",
                crate::output::table::format_notice(&Notice::success("Feedback submitted"))
            );
        }
    }

    Ok(())
}

/// Turn a flow error into the message the user sees.
fn fail(err: SchedulingError) -> anyhow::Error {
    match err {
        SchedulingError::Request { notice, source } => anyhow!(source).context(notice.message),
        other => anyhow!(other),
    }
}
