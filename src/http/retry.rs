//! Retry policy: status classification, backoff, and `Retry-After`.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// A status is retryable when it is exactly 429 or any server error.
///
/// Other 4xx codes indicate a request that retrying cannot fix (bad
/// request, not found, validation), so those are surfaced immediately.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Exponential backoff before the n-th retry: `base * 2^(n-1)`.
pub fn backoff_delay(base: Duration, retry: u32) -> Duration {
    base * 2u32.saturating_pow(retry.saturating_sub(1))
}

/// Wait requested by a `Retry-After` header, when present and given as
/// integer seconds. Anything else (absent, HTTP-date form, garbage) yields
/// `None` and the caller falls back to the backoff formula.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Whether `path` targets an auth endpoint.
///
/// Auth endpoints must never trigger the refresh coordinator: a 401 from
/// `/auth/login` is a failed login, and refreshing on a 401 from
/// `/auth/refresh` itself would loop forever. Substring detection matches
/// the deployed behavior; an explicit allow-list of auth routes would be
/// tighter.
pub fn is_auth_path(path: &str) -> bool {
    path.contains("/auth/") || path.trim_start_matches('/').starts_with("auth/")
}
