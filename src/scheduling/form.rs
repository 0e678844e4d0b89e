use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, TimeZone};
use regex::Regex;
use serde::Serialize;

use crate::api::ScheduleRequest;
use crate::calendar::dates::{compose_local, parse_date, parse_time};
use crate::models::{InterviewDuration, InterviewType, DURATION_CHOICES};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("EMAIL_REGEX pattern is valid")
});

/// Raw input for a new interview, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ScheduleForm {
    pub candidate_name: String,
    pub candidate_email: String,
    pub job_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour
    pub time: String,
    pub duration: u32,
    pub interview_type: Option<InterviewType>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CandidateName,
    CandidateEmail,
    Job,
    Date,
    Time,
    Duration,
    InterviewType,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::CandidateName => "name",
            Field::CandidateEmail => "email",
            Field::Job => "job",
            Field::Date => "date",
            Field::Time => "time",
            Field::Duration => "duration",
            Field::InterviewType => "type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every problem with a form, one entry per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn for_field(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", error.field.label(), error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

impl ScheduleForm {
    /// Check every field and build the request.
    ///
    /// `today` is the local calendar date; a date equal to it is accepted
    /// whatever the time of day.
    pub fn validate<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> Result<ScheduleRequest, ValidationErrors> {
        let mut errors = Collector(Vec::new());

        let name = self.candidate_name.trim();
        if name.is_empty() {
            errors.push(Field::CandidateName, "Candidate name is required");
        }

        let email = self.candidate_email.trim();
        if email.is_empty() {
            errors.push(Field::CandidateEmail, "Candidate email is required");
        } else if !EMAIL_REGEX.is_match(email) {
            errors.push(Field::CandidateEmail, "Enter a valid email address");
        }

        let job_id = self.job_id.trim();
        if job_id.is_empty() {
            errors.push(Field::Job, "Select a job");
        }

        let date = if self.date.trim().is_empty() {
            errors.push(Field::Date, "Date is required");
            None
        } else {
            match parse_date(&self.date) {
                Some(date) if date < today => {
                    errors.push(Field::Date, "Date cannot be in the past");
                    None
                }
                Some(date) => Some(date),
                None => {
                    errors.push(Field::Date, "Date must be YYYY-MM-DD");
                    None
                }
            }
        };

        let time = if self.time.trim().is_empty() {
            errors.push(Field::Time, "Time is required");
            None
        } else {
            let parsed = parse_time(&self.time);
            if parsed.is_none() {
                errors.push(Field::Time, "Time must be HH:MM (24-hour)");
            }
            parsed
        };

        let duration = InterviewDuration::from_minutes(self.duration);
        if duration.is_none() {
            let choices: Vec<String> = DURATION_CHOICES.iter().map(|d| d.to_string()).collect();
            errors.push(
                Field::Duration,
                format!("Duration must be one of {} minutes", choices.join(", ")),
            );
        }

        if self.interview_type.is_none() {
            errors.push(Field::InterviewType, "Select an interview type");
        }

        let scheduled_at = match (date, time) {
            (Some(date), Some(time)) => {
                let composed = compose_local(date, time, tz);
                if composed.is_none() {
                    errors.push(Field::Time, "Time does not exist on that date");
                }
                composed
            }
            _ => None,
        };

        match (scheduled_at, duration, self.interview_type, errors.0.is_empty()) {
            (Some(scheduled_at), Some(duration), Some(interview_type), true) => Ok(ScheduleRequest {
                candidate_name: name.to_string(),
                candidate_email: email.to_string(),
                job_id: job_id.to_string(),
                scheduled_at,
                duration: duration.minutes(),
                interview_type,
                notes: self
                    .notes
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
            }),
            _ => Err(ValidationErrors { errors: errors.0 }),
        }
    }
}
