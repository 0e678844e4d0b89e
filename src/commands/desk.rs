//! Interactive calendar session.
//!
//! Reads one command per line and renders after each. The interview list is
//! fetched lazily and dropped after every successful mutation so the next
//! render sees fresh data. The detail viewer keeps the scope it was opened
//! with until the next `o`. Today's date comes from an injected clock read
//! on every `t` and every render, so a session left open past midnight
//! follows the calendar.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{NaiveDate, TimeZone};
use colored::Colorize;
use log::debug;

use crate::api::InterviewService;
use crate::calendar::bucket::{bucket_month, bucket_week};
use crate::calendar::cursor::{NavigationCursor, ViewMode};
use crate::models::InterviewRecord;
use crate::notice::Notice;
use crate::output::table::{format_detail, format_interview_row, format_month, format_notice, format_week};
use crate::scheduling::flow;
use crate::scheduling::CancelOutcome;
use crate::viewer::{DetailLookup, DetailViewer};

const HELP: &str = "\
Commands:
  ]  [          next / previous week or month
  t             jump to today
  w  m          weekly / monthly view
  o <n|id>      open an interview (number from the list, or id)
  j  k          next / previous interview in the open scope
  c             close the interview
  x             cancel the open interview
  f <1-5> <text>  submit feedback for the open interview
  r             reload interviews
  h             this help
  q             quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskCommand {
    Forward,
    Back,
    Today,
    View(ViewMode),
    Open(String),
    Next,
    Prev,
    Close,
    Cancel,
    Feedback { rating: u8, text: String },
    Refresh,
    Help,
    Quit,
}

/// Parse one input line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<DeskCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head {
        "]" => DeskCommand::Forward,
        "[" => DeskCommand::Back,
        "t" => DeskCommand::Today,
        "w" => DeskCommand::View(ViewMode::Weekly),
        "m" => DeskCommand::View(ViewMode::Monthly),
        "o" if rest.is_empty() => return Err("Usage: o <n|id>".to_string()),
        "o" => DeskCommand::Open(rest.to_string()),
        "j" => DeskCommand::Next,
        "k" => DeskCommand::Prev,
        "c" => DeskCommand::Close,
        "x" => DeskCommand::Cancel,
        "f" => {
            let (rating, text) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "Usage: f <1-5> <text>".to_string())?;
            let rating = rating
                .parse::<u8>()
                .map_err(|_| format!("Rating must be a number from 1 to 5, got '{}'", rating))?;
            DeskCommand::Feedback {
                rating,
                text: text.trim().to_string(),
            }
        }
        "r" => DeskCommand::Refresh,
        "h" | "?" => DeskCommand::Help,
        "q" => DeskCommand::Quit,
        other => return Err(format!("Unknown command '{}'. Type h for help.", other)),
    };
    Ok(Some(command))
}

/// Returns today's date in the display zone.
pub type Clock<'a> = Box<dyn Fn() -> NaiveDate + 'a>;

/// Session state.
pub struct Desk<'a, S: ?Sized, Tz: TimeZone> {
    service: &'a S,
    cursor: NavigationCursor,
    viewer: DetailViewer,
    /// `None` once invalidated; fetched again on the next render.
    records: Option<Vec<InterviewRecord>>,
    clock: Clock<'a>,
    tz: Tz,
}

impl<'a, S: InterviewService + ?Sized, Tz: TimeZone> Desk<'a, S, Tz> {
    pub fn new(service: &'a S, clock: Clock<'a>, tz: Tz) -> Self {
        Desk {
            service,
            cursor: NavigationCursor::new(clock()),
            viewer: DetailViewer::new(),
            records: None,
            clock,
            tz,
        }
    }

    /// Run until `q` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        self.render(out)?;
        for line in input.lines() {
            let line = line?;
            match parse_command(&line) {
                Ok(None) => continue,
                Ok(Some(DeskCommand::Quit)) => break,
                Ok(Some(command)) => {
                    debug!("desk command: {:?}", command);
                    self.apply(command, out)?;
                }
                Err(message) => writeln!(out, "{}", format_notice(&Notice::error(message)))?,
            }
        }
        Ok(())
    }

    fn apply<W: Write>(&mut self, command: DeskCommand, out: &mut W) -> Result<()> {
        match command {
            DeskCommand::Forward => self.cursor.step_forward(),
            DeskCommand::Back => self.cursor.step_back(),
            DeskCommand::Today => self.cursor.snap_to_today((self.clock)()),
            DeskCommand::View(mode) => self.cursor.set_view_mode(mode),
            DeskCommand::Open(target) => return self.open(&target, out),
            DeskCommand::Next => self.viewer.navigate_next(),
            DeskCommand::Prev => self.viewer.navigate_prev(),
            DeskCommand::Close => self.viewer.close(),
            DeskCommand::Cancel => return self.cancel_open(out),
            DeskCommand::Feedback { rating, text } => return self.feedback_open(rating, &text, out),
            DeskCommand::Refresh => self.records = None,
            DeskCommand::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(());
            }
            DeskCommand::Quit => return Ok(()),
        }
        self.render(out)
    }

    /// Fetch the list if it was invalidated.
    fn ensure_loaded(&mut self) -> Result<(), Notice> {
        if self.records.is_none() {
            let records = self
                .service
                .list_interviews()
                .map_err(|e| Notice::from_api_error(&e, "Failed to load interviews"))?;
            debug!("desk loaded {} interviews", records.len());
            self.records = Some(records);
        }
        Ok(())
    }

    fn records(&self) -> &[InterviewRecord] {
        self.records.as_deref().unwrap_or(&[])
    }

    fn render<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if let Err(notice) = self.ensure_loaded() {
            writeln!(out, "{}", format_notice(&notice))?;
            return Ok(());
        }
        let today = (self.clock)();
        let records = self.records();
        let tz = &self.tz;

        if self.viewer.is_open() {
            writeln!(out, "{}", format_detail(&self.viewer, records, tz))?;
            return Ok(());
        }

        let label = self.cursor.label();
        let (view, visible): (String, Vec<&InterviewRecord>) = match self.cursor.view_mode() {
            ViewMode::Weekly => {
                let week = bucket_week(self.cursor.week_start(), records, tz);
                (format_week(&week, &label, today, tz), week.records().collect())
            }
            ViewMode::Monthly => {
                let month = bucket_month(self.cursor.month(), records, tz);
                (format_month(&month, &label, today, tz), month.records().collect())
            }
        };
        writeln!(out, "{}", view)?;
        if !visible.is_empty() {
            writeln!(out)?;
            for (index, record) in visible.iter().enumerate() {
                let date = record.local_date(tz).format("%a %d").to_string();
                writeln!(
                    out,
                    "{:>3}. {} {}",
                    index + 1,
                    date.dimmed(),
                    format_interview_row(record, tz)
                )?;
            }
        }
        Ok(())
    }

    fn open<W: Write>(&mut self, target: &str, out: &mut W) -> Result<()> {
        if let Err(notice) = self.ensure_loaded() {
            writeln!(out, "{}", format_notice(&notice))?;
            return Ok(());
        }
        let scoped_ids = self.cursor.visible_ids(self.records(), &self.tz);
        match resolve_target(target, &scoped_ids) {
            Some(id) => {
                self.viewer.open(id, scoped_ids);
                self.render(out)
            }
            None => {
                let notice = Notice::error(format!("No interview '{}' in this view", target));
                writeln!(out, "{}", format_notice(&notice))?;
                Ok(())
            }
        }
    }

    fn open_record(&mut self) -> Result<Option<InterviewRecord>, Notice> {
        self.ensure_loaded()?;
        match self.viewer.resolve(self.records()) {
            DetailLookup::Found(record) => Ok(Some(record.clone())),
            DetailLookup::NotFound(id) => Err(Notice::error(format!("Interview {} not found", id))),
            DetailLookup::Closed => Ok(None),
        }
    }

    fn cancel_open<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let record = match self.open_record() {
            Ok(Some(record)) => record,
            Ok(None) => {
                writeln!(out, "{}", format_notice(&Notice::error("No interview open. Use o <n> first.")))?;
                return Ok(());
            }
            Err(notice) => {
                writeln!(out, "{}", format_notice(&notice))?;
                return Ok(());
            }
        };

        let notice = match flow::cancel(self.service, &record) {
            Ok(CancelOutcome::Cancelled) => {
                self.records = None;
                Notice::success(format!("Cancelled interview {}", record.id))
            }
            Ok(CancelOutcome::AlreadyCancelled) => {
                Notice::info(format!("Interview {} was already cancelled", record.id))
            }
            Err(e) => e.notice(),
        };
        self.render(out)?;
        writeln!(out, "{}", format_notice(&notice))?;
        Ok(())
    }

    fn feedback_open<W: Write>(&mut self, rating: u8, text: &str, out: &mut W) -> Result<()> {
        let record = match self.open_record() {
            Ok(Some(record)) => record,
            Ok(None) => {
                writeln!(out, "{}", format_notice(&Notice::error("No interview open. Use o <n> first.")))?;
                return Ok(());
            }
            Err(notice) => {
                writeln!(out, "{}", format_notice(&notice))?;
                return Ok(());
            }
        };

        match flow::submit_feedback(self.service, &record, rating, text) {
            Ok(updated) => {
                // Show the submitted feedback straight away; the list is
                // re-fetched on the next render.
                writeln!(out, "{}", format_detail(&self.viewer, std::slice::from_ref(&updated), &self.tz))?;
                writeln!(out, "{}", format_notice(&Notice::success("Feedback submitted")))?;
                self.records = None;
            }
            Err(e) => writeln!(out, "{}", format_notice(&e.notice()))?,
        }
        Ok(())
    }
}

/// A 1-based list number, an exact id, or a unique id prefix. `None` when
/// the target names nothing in the visible scope.
fn resolve_target(target: &str, scoped_ids: &[String]) -> Option<String> {
    if let Ok(n) = target.parse::<usize>() {
        if let Some(id) = n.checked_sub(1).and_then(|i| scoped_ids.get(i)) {
            return Some(id.clone());
        }
    }
    if scoped_ids.iter().any(|id| id == target) {
        return Some(target.to_string());
    }
    let mut matches = scoped_ids.iter().filter(|id| id.starts_with(target));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Some(id.clone()),
        _ => None,
    }
}
