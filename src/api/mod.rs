pub mod client;
#[cfg(test)]
pub mod test_fixtures;
pub mod types;

pub use client::{ApiClient, ApiError};
pub use types::{FeedbackRequest, ScheduleRequest, ScheduleResponse};

use crate::models::{InterviewRecord, JobSummary};

/// Interview endpoints of the hiring service.
pub trait InterviewService {
    fn list_interviews(&self) -> Result<Vec<InterviewRecord>, ApiError>;
    fn schedule_interview(&self, request: &ScheduleRequest) -> Result<ScheduleResponse, ApiError>;
    fn cancel_interview(&self, id: &str) -> Result<(), ApiError>;
    fn submit_feedback(&self, id: &str, request: &FeedbackRequest) -> Result<(), ApiError>;
    /// Open positions for the scheduling form's job selector.
    fn list_open_jobs(&self) -> Result<Vec<JobSummary>, ApiError>;
}

/// Calendar-connection endpoints of the hiring service.
pub trait CalendarService {
    fn check_connection(&self) -> Result<bool, ApiError>;
    /// Consent URL for the external calendar. `return_to` is where the
    /// provider's completion page should deliver its message.
    fn get_auth_url(&self, return_to: &str) -> Result<String, ApiError>;
}
