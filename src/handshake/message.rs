//! The completion message a consent page sends back after the provider
//! redirect.
//!
//! Shape: `{"type": "calendar-oauth", "version": 1, "status": "connected" | "failed", "error"?: string}`.
//! The channel can carry unrelated traffic, so anything that isn't tagged as
//! ours decodes to `None`.

use serde_json::Value;

pub const MESSAGE_TYPE: &str = "calendar-oauth";
pub const MESSAGE_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionNotice {
    Connected,
    /// `reason` is the provider's message, if it sent a usable one.
    Failed { reason: Option<String> },
}

/// Decode a payload into a completion notice.
///
/// A payload tagged `calendar-oauth` with a missing or unknown status is
/// treated as a failure without a reason.
pub fn decode(payload: &Value) -> Option<CompletionNotice> {
    let object = payload.as_object()?;
    if object.get("type").and_then(Value::as_str) != Some(MESSAGE_TYPE) {
        return None;
    }
    if !version_supported(object.get("version")) {
        return None;
    }

    let notice = match object.get("status").and_then(Value::as_str) {
        Some("connected") => CompletionNotice::Connected,
        Some("failed") => CompletionNotice::Failed {
            reason: object
                .get("error")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        },
        _ => CompletionNotice::Failed { reason: None },
    };
    Some(notice)
}

fn version_supported(version: Option<&Value>) -> bool {
    match version {
        None | Some(Value::Null) => true,
        Some(Value::Number(n)) => n.as_u64() == Some(MESSAGE_VERSION),
        // Query-string payloads arrive as strings.
        Some(Value::String(s)) => s.parse::<u64>().ok() == Some(MESSAGE_VERSION),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connected() {
        let payload = json!({"type": "calendar-oauth", "version": 1, "status": "connected"});
        assert_eq!(decode(&payload), Some(CompletionNotice::Connected));
    }

    #[test]
    fn test_version_optional_or_string() {
        let payload = json!({"type": "calendar-oauth", "status": "connected"});
        assert_eq!(decode(&payload), Some(CompletionNotice::Connected));
        let payload = json!({"type": "calendar-oauth", "version": "1", "status": "connected"});
        assert_eq!(decode(&payload), Some(CompletionNotice::Connected));
    }

    #[test]
    fn test_failed_with_reason() {
        let payload = json!({"type": "calendar-oauth", "status": "failed", "error": "access_denied"});
        assert_eq!(
            decode(&payload),
            Some(CompletionNotice::Failed {
                reason: Some("access_denied".to_string())
            })
        );
    }

    #[test]
    fn test_failed_blank_reason_dropped() {
        let payload = json!({"type": "calendar-oauth", "status": "failed", "error": "  "});
        assert_eq!(decode(&payload), Some(CompletionNotice::Failed { reason: None }));
    }

    #[test]
    fn test_malformed_status_is_failure() {
        let payload = json!({"type": "calendar-oauth", "status": "maybe"});
        assert_eq!(decode(&payload), Some(CompletionNotice::Failed { reason: None }));
        let payload = json!({"type": "calendar-oauth"});
        assert_eq!(decode(&payload), Some(CompletionNotice::Failed { reason: None }));
    }

    #[test]
    fn test_unrelated_payloads_ignored() {
        assert_eq!(decode(&json!({"type": "resize", "height": 300})), None);
        assert_eq!(decode(&json!({"status": "connected"})), None);
        assert_eq!(decode(&json!("calendar-oauth")), None);
        assert_eq!(decode(&json!([1, 2, 3])), None);
        assert_eq!(decode(&Value::Null), None);
    }

    #[test]
    fn test_unknown_version_ignored() {
        let payload = json!({"type": "calendar-oauth", "version": 2, "status": "connected"});
        assert_eq!(decode(&payload), None);
    }
}
