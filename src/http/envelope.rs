//! The response envelope shared by every Rentora API endpoint.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Response envelope, discriminated on the `status` field.
///
/// Exactly one variant is present in any response body:
///
/// ```json
/// { "status": "success", "data": ..., "message": "optional" }
/// { "status": "error", "message": "...", "code": "optional", "details": {} }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success {
        data: T,
        #[serde(default)]
        message: Option<String>,
    },
    Error {
        message: String,
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        details: Option<Map<String, Value>>,
    },
}

/// The success half of the envelope, as resolved by
/// [`ApiClient::request`](crate::http::ApiClient::request).
///
/// Callers never see a raw error envelope; those are raised as
/// [`ApiError`](crate::http::ApiError) instead.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T> {
    pub data: T,
    pub message: Option<String>,
}
