use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::InterviewType;

// ============================================================================
// Interview Requests/Responses
// ============================================================================

/// Request body for scheduling a new interview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub candidate_name: String,
    pub candidate_email: String,
    pub job_id: String,
    pub scheduled_at: DateTime<Utc>,
    /// Length in minutes.
    pub duration: u32,
    pub interview_type: InterviewType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response from the schedule endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub id: String,
    /// Only present when an external calendar was connected at creation time
    #[serde(default)]
    pub meeting_link: Option<String>,
}

/// Request body for post-interview feedback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRequest {
    pub rating: u8,
    pub feedback: String,
}

// ============================================================================
// Calendar Responses
// ============================================================================

/// Response from the calendar connection status endpoint
#[derive(Debug, Deserialize)]
pub struct ConnectionResponse {
    pub connected: bool,
}

/// Response from the calendar authorization URL endpoint
#[derive(Debug, Deserialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

// ============================================================================
// Errors
// ============================================================================

/// Error body returned by the service on non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parse an error body, returning the first non-empty message.
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .error
            .into_iter()
            .chain(parsed.message)
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    }
}
