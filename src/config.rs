//! Client configuration.

use std::time::Duration;

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "RENTORA_API_URL";

/// Default API base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";

/// Default number of automatic retries for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 0;

/// Default base delay between retry attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Configuration for [`ApiClient`](crate::http::ApiClient).
///
/// `max_retries` and `retry_delay` are the per-call defaults; individual
/// requests can override them through
/// [`RequestOptions`](crate::http::RequestOptions).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads the base URL from `RENTORA_API_URL`, falling back to the
    /// development default.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Sets the default number of retries for transient failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the default base delay between retry attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}
