use std::time::{Duration, Instant};

use log::debug;
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{
    AuthUrlResponse, ConnectionResponse, ErrorBody, FeedbackRequest, ScheduleRequest,
    ScheduleResponse,
};
use super::{CalendarService, InterviewService};
use crate::models::{InterviewRecord, JobSummary};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Safely slice a string at UTF-8 character boundaries.
/// Returns a substring from `start` to `end` byte positions, adjusted to valid char boundaries.
fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let start = s.floor_char_boundary(start);
    let end = s.ceil_char_boundary(end.min(s.len()));
    &s[start..end]
}

/// Truncate a string for log output, appending "..." if truncated.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", safe_slice(s, 0, max_len))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed (401). Check your API token.")]
    Unauthorized,

    #[error("Resource not found (404). The requested resource may not exist.")]
    NotFound,

    #[error("Rate limited (429). Please wait before making more requests.")]
    RateLimited,

    #[error("Server error ({status}){}", message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    ServerError { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid API URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// The message the service itself supplied, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::ServerError { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// HTTP client for the interview service.
pub struct ApiClient {
    base_url: Url,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::NetworkError(format!("failed to create HTTP client: {}", e)))?;

        let parsed = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url: parsed,
            token,
            client,
        })
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so an id containing `/`, `?` or `#` stays a single segment.
    fn url(&self, segments: &[&str]) -> Result<String, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Send a request and map non-2xx statuses to [`ApiError`].
    fn send(&self, method: &str, url: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        debug!("{} {}", method, url);
        let start = Instant::now();
        let response = self.authorized(request).send().map_err(|e| {
            debug!("  network error after {:?}: {}", start.elapsed(), e);
            ApiError::NetworkError(e.to_string())
        })?;

        let status = response.status();
        debug!("  response: {} in {:?}", status, start.elapsed());

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            401 => {
                debug!("  unauthorized (401)");
                Err(ApiError::Unauthorized)
            }
            404 => {
                debug!("  not found (404)");
                Err(ApiError::NotFound)
            }
            429 => {
                debug!("  rate limited (429)");
                Err(ApiError::RateLimited)
            }
            code => {
                let body = response.text().unwrap_or_default();
                debug!("  server error ({}): {}", code, truncate_for_log(&body, 500));
                Err(ApiError::ServerError {
                    status: code,
                    message: ErrorBody::message_from(&body),
                })
            }
        }
    }

    fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response
            .text()
            .map_err(|e| ApiError::InvalidResponse(format!("failed to read body: {}", e)))?;
        debug!("  response body: {} bytes", body.len());
        debug!("  response preview: {}", truncate_for_log(&body, 200));
        serde_json::from_str(&body).map_err(|e| {
            debug!("  deserialization error: {}", e);
            ApiError::InvalidResponse(format!("{}\n\nResponse body:\n{}", e, truncate_for_log(&body, 500)))
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &[&str], query: &[(&str, &str)]) -> Result<T, ApiError> {
        let url = self.url(path)?;
        let response = self.send("GET", &url, self.client.get(&url).query(query))?;
        Self::read_json(response)
    }

    fn post<T: DeserializeOwned>(&self, path: &[&str], body: &impl serde::Serialize) -> Result<T, ApiError> {
        let url = self.url(path)?;
        let response = self.send("POST", &url, self.client.post(&url).json(body))?;
        Self::read_json(response)
    }

    /// POST where only the status matters.
    fn post_unit(&self, path: &[&str], body: Option<&impl serde::Serialize>) -> Result<(), ApiError> {
        let url = self.url(path)?;
        let request = match body {
            Some(body) => self.client.post(&url).json(body),
            None => self.client.post(&url),
        };
        self.send("POST", &url, request)?;
        Ok(())
    }
}

impl InterviewService for ApiClient {
    fn list_interviews(&self) -> Result<Vec<InterviewRecord>, ApiError> {
        let interviews: Vec<InterviewRecord> = self.get(&["interviews"], &[])?;
        debug!("  got {} interviews", interviews.len());
        Ok(interviews)
    }

    fn schedule_interview(&self, request: &ScheduleRequest) -> Result<ScheduleResponse, ApiError> {
        self.post(&["interviews"], request)
    }

    fn cancel_interview(&self, id: &str) -> Result<(), ApiError> {
        self.post_unit(&["interviews", id, "cancel"], None::<&()>)
    }

    fn submit_feedback(&self, id: &str, request: &FeedbackRequest) -> Result<(), ApiError> {
        self.post_unit(&["interviews", id, "feedback"], Some(request))
    }

    fn list_open_jobs(&self) -> Result<Vec<JobSummary>, ApiError> {
        self.get(&["jobs"], &[("status", "open")])
    }
}

impl CalendarService for ApiClient {
    fn check_connection(&self) -> Result<bool, ApiError> {
        let response: ConnectionResponse = self.get(&["calendar", "connection"], &[])?;
        Ok(response.connected)
    }

    fn get_auth_url(&self, return_to: &str) -> Result<String, ApiError> {
        let response: AuthUrlResponse = self.get(&["calendar", "auth-url"], &[("returnTo", return_to)])?;
        Ok(response.url)
    }
}
