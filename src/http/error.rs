//! The error value raised on any failed request.

use serde_json::{Map, Value};
use thiserror::Error;

/// Error raised by [`ApiClient`](crate::http::ApiClient) on any non-success
/// outcome.
///
/// `status` is the HTTP status code of the failing response, with `0`
/// reserved for transport-level failures that never produced a response.
/// `code` and `details` are forwarded verbatim from the backend's error
/// envelope when present, so callers can pattern-match without another
/// round-trip.
///
/// The type is `Clone` so a single refresh outcome can be fanned out to
/// every caller queued behind it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub code: Option<String>,
    pub details: Option<Map<String, Value>>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Transport-level failure (DNS, refused connection, dropped stream).
    /// No HTTP status exists, so `status` is 0.
    pub fn connectivity(source: &reqwest::Error) -> Self {
        Self::new(0, format!("Unable to reach the server: {source}"))
    }

    /// The session is expired and could not be renewed.
    pub fn session_expired() -> Self {
        Self::new(401, "Session expired. Please log in again.")
    }

    /// Built from a parsed error envelope and the HTTP status it rode in on.
    pub fn from_envelope(
        status: u16,
        message: String,
        code: Option<String>,
        details: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            status,
            message,
            code,
            details,
        }
    }

    /// Fallback when the response body carries no usable error envelope.
    pub fn status_only(status: u16) -> Self {
        Self::new(status, format!("Request failed with status {status}"))
    }

    /// The request body could not be serialized to JSON.
    pub fn encoding(source: &serde_json::Error) -> Self {
        Self::new(0, format!("Failed to encode request body: {source}"))
    }

    /// A success response carried a body that is not a valid envelope.
    pub fn decoding(status: u16, source: &serde_json::Error) -> Self {
        Self::new(status, format!("Failed to decode response body: {source}"))
    }

    /// True when this error represents a missing or expired session.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// True when this error never reached the server.
    pub fn is_connectivity(&self) -> bool {
        self.status == 0
    }
}
