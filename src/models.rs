//! Domain types for hirecal.
//!
//! These types mirror the interview service's JSON (camelCase on the wire) and
//! are used unchanged for JSON output. Request wrappers live in `api::types`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Interview Types
// ============================================================================

/// Lifecycle of an interview.
///
/// `scheduled -> in_progress -> completed`, or `scheduled -> cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, InterviewStatus::Completed | InterviewStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification only; no behavior hangs off the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Screening,
    Technical,
    Behavioral,
    Final,
}

impl InterviewType {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewType::Screening => "screening",
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::Final => "final",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allowed interview lengths in minutes.
pub const DURATION_CHOICES: [u32; 6] = [15, 30, 45, 60, 90, 120];

/// An interview length drawn from [`DURATION_CHOICES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterviewDuration(u32);

impl InterviewDuration {
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        DURATION_CHOICES
            .contains(&minutes)
            .then_some(InterviewDuration(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

/// An interview as stored by the interview service.
///
/// The core treats records as read-mostly: all writes go through
/// `scheduling::flow`, and the list is re-fetched afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: String,
    pub scheduled_at: DateTime<Utc>,
    /// Length in minutes.
    pub duration: u32,
    pub status: InterviewStatus,
    pub interview_type: InterviewType,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub candidate_email: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl InterviewRecord {
    /// The calendar day this interview falls on in `tz`.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.scheduled_at.with_timezone(tz).date_naive()
    }

    pub fn has_feedback(&self) -> bool {
        self.rating.is_some() && self.feedback.as_deref().is_some_and(|f| !f.trim().is_empty())
    }
}

// ============================================================================
// Calendar Types
// ============================================================================

/// A calendar month, 1-based (`month()` in 1..=12).
///
/// Always valid once constructed; backed by the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(YearMonth { first })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    /// Shift by whole months. Arithmetic is on the (year, month) pair only.
    ///
    /// `None` when the result falls outside the representable range.
    pub fn add_months(self, delta: i32) -> Option<Self> {
        let total = self
            .year()
            .checked_mul(12)?
            .checked_add(self.month() as i32 - 1)?
            .checked_add(delta)?;
        YearMonth::new(total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid month '{}': expected YYYY-MM", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in '{}'", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in '{}'", s))?;
        YearMonth::new(year, month).ok_or_else(|| format!("month out of range in '{}'", s))
    }
}

// ============================================================================
// Job Types
// ============================================================================

/// An open position, as offered by the scheduling form's job selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub title: String,
}
