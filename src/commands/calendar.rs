use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::TimeZone;
use serde::Serialize;

use crate::api::CalendarService;
use crate::cli::context::RunContext;
use crate::config::Settings;
use crate::handshake::state::CalendarHandshake;
use crate::handshake::window::SystemBrowser;
use crate::handshake::{self, ConnectOptions, ConnectOutcome, HandshakePhase};
use crate::notice::Notice;
use crate::output::format::OutputMode;

#[derive(Serialize)]
struct StatusJson {
    status: HandshakePhase,
}

#[derive(Serialize)]
struct ConnectJson<'a> {
    status: HandshakePhase,
    notice: &'a Notice,
}

pub fn status<S: CalendarService + ?Sized, Tz: TimeZone>(service: &S, ctx: &RunContext<Tz>) -> Result<()> {
    let mut calendar = CalendarHandshake::new();
    let connected = service
        .check_connection()
        .context("Failed to check calendar connection")?;
    calendar.apply_status_query(connected);

    match ctx.output_mode {
        OutputMode::Json => {
            println!(
                "{}",
                crate::output::json::to_json(&StatusJson {
                    status: calendar.phase()
                })
            );
        }
        OutputMode::Tty => {
            println!("{}", crate::output::table::format_connection(calendar.phase()));
        }
    }

    Ok(())
}

pub fn connect<S: CalendarService + ?Sized, Tz: TimeZone>(
    service: &S,
    settings: &Settings,
    timeout: Option<u64>,
    no_browser: bool,
    ctx: &RunContext<Tz>,
) -> Result<()> {
    let mut calendar = CalendarHandshake::new();
    let connected = service
        .check_connection()
        .context("Failed to check calendar connection")?;
    calendar.apply_status_query(connected);

    if connected {
        let notice = Notice::info("Calendar is already connected.");
        print_connect(&calendar, &notice, ctx);
        return Ok(());
    }

    let options = ConnectOptions {
        callback_port: settings.callback_port,
        timeout: Duration::from_secs(timeout.unwrap_or(settings.handshake_timeout_secs)),
    };
    let window = SystemBrowser { disabled: no_browser };

    if ctx.output_mode == OutputMode::Tty {
        eprintln!("Waiting for the calendar provider (Ctrl-C to give up)...");
    }
    let outcome = handshake::connect(service, &window, &mut calendar, &options)
        .context("Calendar connection failed")?;

    let notice = outcome.notice(options.timeout);
    print_connect(&calendar, &notice, ctx);

    match outcome {
        ConnectOutcome::Connected => Ok(()),
        ConnectOutcome::Failed { .. } | ConnectOutcome::TimedOut => bail!("Calendar not connected"),
    }
}

fn print_connect<Tz: TimeZone>(calendar: &CalendarHandshake, notice: &Notice, ctx: &RunContext<Tz>) {
    match ctx.output_mode {
        OutputMode::Json => {
            println!(
                "{}",
                crate::output::json::to_json(&ConnectJson {
                    status: calendar.phase(),
                    notice,
                })
            );
        }
        OutputMode::Tty => {
            println!("{}", crate::output::table::format_notice(notice));
        }
    }
}
