//! In-memory service fake for unit tests.
//!
//! Records every call so tests can assert that local validation stopped a
//! request before it reached the network.

use std::cell::RefCell;

use super::types::{FeedbackRequest, ScheduleRequest, ScheduleResponse};
use super::{ApiError, CalendarService, InterviewService};
use crate::models::{InterviewRecord, InterviewStatus, JobSummary};

#[derive(Default)]
pub struct FakeService {
    pub interviews: RefCell<Vec<InterviewRecord>>,
    pub jobs: Vec<JobSummary>,
    pub connected: bool,
    pub auth_url: String,
    pub meeting_link: Option<String>,
    /// When set, every mutating call fails with this status and message.
    pub fail_with: Option<(u16, Option<String>)>,
    pub calls: RefCell<Vec<String>>,
    pub scheduled: RefCell<Vec<ScheduleRequest>>,
}

impl FakeService {
    pub fn with_interviews(interviews: Vec<InterviewRecord>) -> Self {
        FakeService {
            interviews: RefCell::new(interviews),
            auth_url: "https://consent.example.com/authorize".to_string(),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record_call(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn failure(&self) -> Result<(), ApiError> {
        match &self.fail_with {
            Some((status, message)) => Err(ApiError::ServerError {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl InterviewService for FakeService {
    fn list_interviews(&self) -> Result<Vec<InterviewRecord>, ApiError> {
        self.record_call("list".to_string());
        Ok(self.interviews.borrow().clone())
    }

    fn schedule_interview(&self, request: &ScheduleRequest) -> Result<ScheduleResponse, ApiError> {
        self.record_call("schedule".to_string());
        self.failure()?;
        self.scheduled.borrow_mut().push(request.clone());
        Ok(ScheduleResponse {
            id: format!("iv-new-{}", self.scheduled.borrow().len()),
            meeting_link: self.meeting_link.clone(),
        })
    }

    fn cancel_interview(&self, id: &str) -> Result<(), ApiError> {
        self.record_call(format!("cancel {}", id));
        self.failure()?;
        let mut interviews = self.interviews.borrow_mut();
        let record = interviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ApiError::NotFound)?;
        record.status = InterviewStatus::Cancelled;
        Ok(())
    }

    fn submit_feedback(&self, id: &str, request: &FeedbackRequest) -> Result<(), ApiError> {
        self.record_call(format!("feedback {}", id));
        self.failure()?;
        let mut interviews = self.interviews.borrow_mut();
        let record = interviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ApiError::NotFound)?;
        record.rating = Some(request.rating);
        record.feedback = Some(request.feedback.clone());
        Ok(())
    }

    fn list_open_jobs(&self) -> Result<Vec<JobSummary>, ApiError> {
        self.record_call("jobs".to_string());
        Ok(self.jobs.clone())
    }
}

impl CalendarService for FakeService {
    fn check_connection(&self) -> Result<bool, ApiError> {
        self.record_call("connection".to_string());
        Ok(self.connected)
    }

    fn get_auth_url(&self, return_to: &str) -> Result<String, ApiError> {
        self.record_call(format!("auth-url {}", return_to));
        self.failure()?;
        Ok(self.auth_url.clone())
    }
}
