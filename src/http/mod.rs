//! HTTP client core: request building, retry/backoff, response
//! classification, and single-flight session refresh.

mod client;
mod envelope;
mod error;
mod refresh;
mod request;
mod retry;

pub use client::ApiClient;
pub use envelope::{ApiSuccess, Envelope};
pub use error::ApiError;
pub use refresh::RefreshCoordinator;
pub use request::{Query, QueryValue, RequestOptions};
pub use retry::{backoff_delay, is_auth_path, is_retryable_status, retry_after};
