//! Body parsing and error classification for status probes.

use serde::Deserialize;

use super::error::StatusError;
use super::FetchOutcome;
use crate::result::JobState;

/// Wire shape of the status body: `{"result": "pending" | "completed" | "error"}`.
#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    result: Option<String>,
}

/// Parse a 2xx response body into an outcome.
///
/// A body that is not valid JSON is treated as transient (it may be a
/// truncated response). A well-formed body whose result value is missing or
/// unrecognized is a definitive job error, not something to retry forever.
pub(crate) fn parse_status_body(body: &[u8]) -> FetchOutcome {
    let parsed: StatusBody = match serde_json::from_slice(body) {
        Ok(b) => b,
        Err(e) => return classify(&StatusError::Body(e)),
    };

    match parsed.result.as_deref() {
        Some("completed") => FetchOutcome::State(JobState::Completed),
        Some("error") => FetchOutcome::State(JobState::Errored),
        Some("pending") => FetchOutcome::State(JobState::Pending),
        other => {
            tracing::warn!(result = ?other, "unexpected status result, treating as job error");
            FetchOutcome::State(JobState::Errored)
        }
    }
}

/// Classify a probe error into a retry decision.
///
/// Timeouts, connection-class curl errors, and malformed bodies are
/// transient; everything else (non-2xx status included) is definitive.
pub fn classify(e: &StatusError) -> FetchOutcome {
    match e {
        StatusError::Curl(ce) if is_transient_curl(ce) => FetchOutcome::Transient(e.to_string()),
        StatusError::Body(_) => FetchOutcome::Transient(e.to_string()),
        StatusError::Curl(_) | StatusError::Http(_) => FetchOutcome::Definitive(e.to_string()),
    }
}

fn is_transient_curl(e: &curl::Error) -> bool {
    e.is_operation_timedout()
        || e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_results_map_to_states() {
        assert_eq!(
            parse_status_body(br#"{"result": "completed"}"#),
            FetchOutcome::State(JobState::Completed)
        );
        assert_eq!(
            parse_status_body(br#"{"result": "error"}"#),
            FetchOutcome::State(JobState::Errored)
        );
        assert_eq!(
            parse_status_body(br#"{"result": "pending"}"#),
            FetchOutcome::State(JobState::Pending)
        );
    }

    #[test]
    fn unrecognized_result_is_a_job_error() {
        assert_eq!(
            parse_status_body(br#"{"result": "exploded"}"#),
            FetchOutcome::State(JobState::Errored)
        );
        // Well-formed JSON with no result field at all.
        assert_eq!(
            parse_status_body(br#"{"status": "ok"}"#),
            FetchOutcome::State(JobState::Errored)
        );
    }

    #[test]
    fn malformed_body_is_transient() {
        let out = parse_status_body(b"{\"result\": \"pend");
        assert!(matches!(out, FetchOutcome::Transient(_)));
        let out = parse_status_body(b"<html>502 Bad Gateway</html>");
        assert!(matches!(out, FetchOutcome::Transient(_)));
    }

    #[test]
    fn http_error_status_is_definitive() {
        let out = classify(&StatusError::Http(500));
        assert_eq!(out, FetchOutcome::Definitive("HTTP 500".to_string()));
        let out = classify(&StatusError::Http(404));
        assert!(matches!(out, FetchOutcome::Definitive(_)));
    }
}
