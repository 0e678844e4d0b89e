use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use super::form::{ScheduleForm, ValidationErrors};
use crate::api::{ApiError, FeedbackRequest, InterviewService};
use crate::handshake::ConnectionStatus;
use crate::models::{InterviewRecord, InterviewStatus};
use crate::notice::Notice;

pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("{0}")]
    Invalid(ValidationErrors),

    #[error("Interview {0} not found")]
    NotFound(String),

    #[error("Cannot cancel an interview that is {0}")]
    NotCancellable(InterviewStatus),

    #[error("Feedback can only be submitted for completed interviews (this one is {0})")]
    FeedbackNotAllowed(InterviewStatus),

    #[error("Rating must be between 1 and 5 (got {0})")]
    InvalidRating(u8),

    #[error("Feedback text is required")]
    EmptyFeedback,

    #[error("{notice}")]
    Request {
        notice: Notice,
        #[source]
        source: ApiError,
    },
}

impl SchedulingError {
    fn request(source: ApiError, fallback: &str) -> Self {
        SchedulingError::Request {
            notice: Notice::from_api_error(&source, fallback),
            source,
        }
    }

    /// The notice to show the user for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            SchedulingError::Request { notice, .. } => notice.clone(),
            other => Notice::error(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    pub id: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
}

impl ScheduleOutcome {
    /// Informational note when no meeting link came back.
    pub fn link_notice(&self, calendar: ConnectionStatus) -> Option<Notice> {
        if self.meeting_link.is_some() {
            return None;
        }
        let message = match calendar {
            ConnectionStatus::Connected => "No meeting link was generated for this interview.",
            _ => {
                "No meeting link was generated. Run `hirecal calendar connect` to add links to new interviews."
            }
        };
        Some(Notice::info(message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    Cancelled,
    /// Nothing was sent; the interview was cancelled already.
    AlreadyCancelled,
}

/// Look up an interview by id.
pub fn find_interview<'a>(records: &'a [InterviewRecord], id: &str) -> Result<&'a InterviewRecord, SchedulingError> {
    records
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| SchedulingError::NotFound(id.to_string()))
}

/// Validate the form and create the interview.
pub fn schedule<S: InterviewService + ?Sized, Tz: TimeZone>(
    service: &S,
    form: &ScheduleForm,
    today: NaiveDate,
    tz: &Tz,
) -> Result<ScheduleOutcome, SchedulingError> {
    let request = form.validate(today, tz).map_err(SchedulingError::Invalid)?;
    debug!(
        "scheduling {} interview for {} at {}",
        request.interview_type, request.candidate_email, request.scheduled_at
    );

    let response = service
        .schedule_interview(&request)
        .map_err(|e| SchedulingError::request(e, "Failed to schedule interview"))?;
    info!("scheduled interview {}", response.id);

    Ok(ScheduleOutcome {
        id: response.id,
        scheduled_at: request.scheduled_at,
        meeting_link: response.meeting_link,
    })
}

/// Cancel a scheduled interview.
///
/// Cancelling something already cancelled succeeds without a request;
/// completed and in-progress interviews can't be cancelled.
pub fn cancel<S: InterviewService + ?Sized>(
    service: &S,
    record: &InterviewRecord,
) -> Result<CancelOutcome, SchedulingError> {
    match record.status {
        InterviewStatus::Cancelled => {
            debug!("interview {} already cancelled", record.id);
            Ok(CancelOutcome::AlreadyCancelled)
        }
        InterviewStatus::Scheduled => {
            service
                .cancel_interview(&record.id)
                .map_err(|e| SchedulingError::request(e, "Failed to cancel interview"))?;
            info!("cancelled interview {}", record.id);
            Ok(CancelOutcome::Cancelled)
        }
        status => Err(SchedulingError::NotCancellable(status)),
    }
}

/// Submit feedback for a completed interview.
///
/// Returns the record with the feedback applied so callers can show it
/// without re-fetching.
pub fn submit_feedback<S: InterviewService + ?Sized>(
    service: &S,
    record: &InterviewRecord,
    rating: u8,
    text: &str,
) -> Result<InterviewRecord, SchedulingError> {
    if record.status != InterviewStatus::Completed {
        return Err(SchedulingError::FeedbackNotAllowed(record.status));
    }
    if !RATING_RANGE.contains(&rating) {
        return Err(SchedulingError::InvalidRating(rating));
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(SchedulingError::EmptyFeedback);
    }

    let request = FeedbackRequest {
        rating,
        feedback: text.to_string(),
    };
    service
        .submit_feedback(&record.id, &request)
        .map_err(|e| SchedulingError::request(e, "Failed to submit feedback"))?;
    info!("submitted feedback for interview {}", record.id);

    let mut updated = record.clone();
    updated.rating = Some(request.rating);
    updated.feedback = Some(request.feedback);
    Ok(updated)
}
