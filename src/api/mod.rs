//! HTTP integration with the remote scoring service.
//!
//! Two endpoints: `POST /predict` scores a batch of borrower records, and
//! `GET /logs` returns past predictions. Both carry the caller identity as a
//! header. The service is a collaborator, not part of this crate; the
//! `ScoringService` trait is the seam that lets the pipeline run against an
//! in-memory fake in tests.

use std::fmt;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{BorrowerRecord, LogEntry, Prediction};

/// Header carrying the caller identity on every request.
pub const IDENTITY_HEADER: &str = "x-user-email";

/// How a scoring call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// No usable response was obtained (connect failure, broken body, ...).
    /// The payload is diagnostic detail for operators, not for end users.
    Transport(String),
    /// The service answered with a structured error message; shown verbatim
    /// and terminal for the attempt.
    Service(String),
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringError::Transport(detail) => write!(f, "transport failure: {detail}"),
            ScoringError::Service(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ScoringError {}

/// Collaborator seam for the scoring service.
pub trait ScoringService {
    /// Submit the full batch in one request, preserving record order.
    /// The response is index-aligned with the request; the service must not
    /// reorder it.
    fn submit_batch(
        &self,
        identity: &str,
        records: &[BorrowerRecord],
    ) -> Result<Vec<Prediction>, ScoringError>;

    /// Fetch up to `limit` historical entries, newest first per the backend.
    fn fetch_logs(&self, identity: &str, limit: usize) -> Result<Vec<LogEntry>, ScoringError>;
}

/// Blocking HTTP implementation of `ScoringService`.
pub struct HttpScoringClient {
    client: Client,
    base_url: String,
}

impl HttpScoringClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

impl ScoringService for HttpScoringClient {
    fn submit_batch(
        &self,
        identity: &str,
        records: &[BorrowerRecord],
    ) -> Result<Vec<Prediction>, ScoringError> {
        let url = self.endpoint("predict");
        let resp = self
            .client
            .post(&url)
            .header(IDENTITY_HEADER, identity)
            .json(records)
            .send()
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "batch submission failed in transit");
                ScoringError::Transport(e.to_string())
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| {
            tracing::error!(url = %url, error = %e, "failed to read scoring response body");
            ScoringError::Transport(e.to_string())
        })?;

        decode_predictions(status, &body)
    }

    fn fetch_logs(&self, identity: &str, limit: usize) -> Result<Vec<LogEntry>, ScoringError> {
        let url = self.endpoint("logs");
        let resp = self
            .client
            .get(&url)
            .header(IDENTITY_HEADER, identity)
            .query(&[("limit", limit.to_string())])
            .send()
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "log fetch failed in transit");
                ScoringError::Transport(e.to_string())
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| {
            tracing::error!(url = %url, error = %e, "failed to read log response body");
            ScoringError::Transport(e.to_string())
        })?;

        decode_logs(status, &body)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Interpret a scoring response body.
///
/// The service reports failures as a JSON object with an `error` message
/// (regardless of status code); successes are a JSON array aligned with the
/// request order.
fn decode_predictions(status: u16, body: &str) -> Result<Vec<Prediction>, ScoringError> {
    if let Ok(err) = serde_json::from_str::<ErrorBody>(body) {
        return Err(ScoringError::Service(err.error));
    }
    serde_json::from_str::<Vec<Prediction>>(body).map_err(|e| {
        tracing::error!(status, error = %e, "unreadable scoring response");
        ScoringError::Transport(format!("unreadable response (status {status}): {e}"))
    })
}

fn decode_logs(status: u16, body: &str) -> Result<Vec<LogEntry>, ScoringError> {
    if let Ok(err) = serde_json::from_str::<ErrorBody>(body) {
        return Err(ScoringError::Service(err.error));
    }
    serde_json::from_str::<Vec<LogEntry>>(body).map_err(|e| {
        tracing::error!(status, error = %e, "unreadable log response");
        ScoringError::Transport(format!("unreadable response (status {status}): {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_predictions_accepts_aligned_array_with_extra_keys() {
        let body = r#"[
            {
                "borrower": {"loan_id": "L-001"},
                "default_probability": 0.123,
                "risk_level": "Low risk",
                "recommended_action": "Send reminder",
                "user_email": "guest"
            },
            {
                "default_probability": 0.841,
                "risk_level": "High risk",
                "recommended_action": "Prioritize collection / restructure loan"
            }
        ]"#;

        let predictions = decode_predictions(200, body).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].default_probability, 0.123);
        assert_eq!(predictions[1].risk_level, "High risk");
    }

    #[test]
    fn decode_predictions_surfaces_service_error_verbatim() {
        let body = r#"{"error": "Please enter valid data for all fields"}"#;
        let err = decode_predictions(400, body).unwrap_err();
        assert_eq!(
            err,
            ScoringError::Service("Please enter valid data for all fields".to_string())
        );
    }

    #[test]
    fn decode_predictions_treats_garbage_as_transport_failure() {
        let err = decode_predictions(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ScoringError::Transport(_)));
    }

    #[test]
    fn decode_logs_handles_partial_snapshots() {
        let body = r#"[
            {
                "timestamp": "2025-08-01 10:00:00",
                "borrower": {"loan_id": "L-001", "dti": 18.65},
                "default_probability": 0.42,
                "risk_level": "Medium risk",
                "recommended_action": "Call borrower"
            },
            {
                "timestamp": "2025-08-01 09:00:00",
                "default_probability": 0.91,
                "risk_level": "High risk",
                "recommended_action": "Prioritize collection / restructure loan"
            }
        ]"#;

        let entries = decode_logs(200, body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].borrower.as_ref().unwrap().loan_id.as_deref(),
            Some("L-001")
        );
        assert!(entries[1].borrower.is_none());
    }

    #[test]
    fn decode_logs_surfaces_service_error() {
        let err = decode_logs(500, r#"{"error": "Failed to load logs"}"#).unwrap_err();
        assert_eq!(err, ScoringError::Service("Failed to load logs".to_string()));
    }

    #[test]
    fn endpoint_joins_without_doubled_slash() {
        let client = HttpScoringClient::new("http://127.0.0.1:8000/");
        assert_eq!(client.endpoint("predict"), "http://127.0.0.1:8000/predict");
    }
}
