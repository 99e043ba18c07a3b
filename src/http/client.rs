//! The client core: every outbound call to the Rentora API passes through
//! [`ApiClient::request`], which attaches the session cookies, serializes
//! the body, appends query parameters, classifies the response envelope,
//! retries transient failures with exponential backoff, and transparently
//! renews an expired session through a single-flight refresh.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;

use super::envelope::{ApiSuccess, Envelope};
use super::error::ApiError;
use super::refresh::RefreshCoordinator;
use super::request::{Query, RequestOptions};
use super::retry::{backoff_delay, is_auth_path, is_retryable_status, retry_after};

/// The session-renewal endpoint, the only path the core knows by name.
const REFRESH_PATH: &str = "/auth/refresh";

/// Outcome of one pass through the retry loop.
enum Flow<T> {
    Done(ApiSuccess<T>),
    /// A qualifying 401; the caller should renew the session and re-issue.
    Unauthorized,
}

/// HTTP client for the Rentora API.
///
/// Cheap to clone; clones share the cookie jar and the refresh
/// coordinator, so concurrent callers anywhere in the process coordinate
/// onto a single in-flight session renewal.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ClientConfig,
    refresh: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Creates a client with a cookie-jar-enabled transport. Session state
    /// lives entirely in two server-managed cookies; the client never
    /// reads or stores tokens itself.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::new(0, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a client over an existing reqwest `Client`. The caller is
    /// responsible for enabling a cookie store if sessions are needed.
    pub fn with_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            config,
            refresh: Arc::new(RefreshCoordinator::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Performs a request and resolves the parsed success envelope.
    ///
    /// Runs in two phases: the first runs the retry loop with session
    /// refresh allowed; if it ends on a qualifying 401 the session is
    /// renewed (at most one refresh call in flight across all clones of
    /// this client) and the request is re-issued exactly once with refresh
    /// disabled, so the renewal branch cannot be re-entered.
    #[tracing::instrument(skip(self, options))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiSuccess<T>, ApiError> {
        let allow_refresh = !options.skip_refresh && !is_auth_path(path);

        match self.run_attempts(path, &options, allow_refresh).await? {
            Flow::Done(success) => Ok(success),
            Flow::Unauthorized => {
                debug!("Got 401 from {}, attempting session refresh...", path);
                if let Err(e) = self.refresh.run(|| self.refresh_session()).await {
                    warn!("Session refresh failed: {}", e);
                    return Err(ApiError::session_expired());
                }
                match self.run_attempts(path, &options, false).await? {
                    Flow::Done(success) => Ok(success),
                    // Unreachable with refresh disabled; surface as expired.
                    Flow::Unauthorized => Err(ApiError::session_expired()),
                }
            }
        }
    }

    /// GET without query parameters.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiSuccess<T>, ApiError> {
        self.request(path, RequestOptions::get()).await
    }

    /// GET with query parameters; absent optional filters are omitted from
    /// the query string.
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<ApiSuccess<T>, ApiError> {
        self.request(path, RequestOptions::get().query(query)).await
    }

    /// POST with a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiSuccess<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(path, RequestOptions::post().json(body)?).await
    }

    /// PUT with a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiSuccess<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(path, RequestOptions::put().json(body)?).await
    }

    /// PATCH with a JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<ApiSuccess<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(path, RequestOptions::patch().json(body)?).await
    }

    /// DELETE without a body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiSuccess<T>, ApiError> {
        self.request(path, RequestOptions::delete()).await
    }

    /// The retry loop for one phase of a logical request.
    ///
    /// `Retry-After` from a 429 is recorded as an override for the next
    /// iteration's delay instead of slept inline, so it replaces the
    /// backoff formula rather than adding to it.
    async fn run_attempts<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
        allow_refresh: bool,
    ) -> Result<Flow<T>, ApiError> {
        let max_retries = options.max_retries.unwrap_or(self.config.max_retries);
        let retry_delay = options.retry_delay.unwrap_or(self.config.retry_delay);
        let url = self.url_for(path);

        let mut last_error: Option<ApiError> = None;
        let mut delay_override: Option<Duration> = None;

        for attempt in 0..=max_retries {
            if attempt > 0 {
                let delay = delay_override
                    .take()
                    .unwrap_or_else(|| backoff_delay(retry_delay, attempt));
                debug!(
                    "Retrying {} in {:?} (attempt {}/{})...",
                    path,
                    delay,
                    attempt + 1,
                    max_retries + 1
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.send(&url, options).await {
                Ok(response) => response,
                Err(e) => {
                    let err = ApiError::connectivity(&e);
                    if attempt < max_retries {
                        warn!("Request to {} failed to reach the server ({}), will retry", path, e);
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
            };

            let status = response.status();

            if status == StatusCode::UNAUTHORIZED && allow_refresh {
                return Ok(Flow::Unauthorized);
            }

            if is_retryable_status(status) && attempt < max_retries {
                if status == StatusCode::TOO_MANY_REQUESTS {
                    delay_override = retry_after(response.headers());
                }
                warn!("Request to {} returned {}, will retry", path, status);
                last_error = Some(ApiError::status_only(status.as_u16()));
                continue;
            }

            return self.classify(status, response).await.map(Flow::Done);
        }

        // Defensive: every final attempt returns above.
        Err(last_error.unwrap_or_else(|| {
            ApiError::new(
                0,
                format!("Request to {path} failed after {} attempts", max_retries + 1),
            )
        }))
    }

    /// Builds and sends one network attempt.
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = self
            .client
            .request(options.method.clone(), url)
            .headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query.pairs());
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        debug!("{} {}...", options.method, url);
        builder.send().await
    }

    /// Parses the body as a response envelope and converts the outcome.
    async fn classify<T: DeserializeOwned>(
        &self,
        status: StatusCode,
        response: Response,
    ) -> Result<ApiSuccess<T>, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::connectivity(&e))?;

        let envelope: Envelope<T> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                return Err(if status.is_success() {
                    ApiError::decoding(status.as_u16(), &e)
                } else {
                    // No usable envelope on a failed response; fall back to
                    // the generic per-status message.
                    ApiError::status_only(status.as_u16())
                });
            }
        };

        match envelope {
            Envelope::Error {
                message,
                code,
                details,
            } => Err(ApiError::from_envelope(status.as_u16(), message, code, details)),
            Envelope::Success { .. } if !status.is_success() => {
                Err(ApiError::status_only(status.as_u16()))
            }
            Envelope::Success { data, message } => Ok(ApiSuccess { data, message }),
        }
    }

    /// Issues the session-renewal call. The refresh cookie rides along
    /// automatically; any failure maps to an expired session.
    #[tracing::instrument(skip(self))]
    async fn refresh_session(&self) -> Result<(), ApiError> {
        let url = self.url_for(REFRESH_PATH);
        debug!("POST {} to renew session...", url);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| ApiError::connectivity(&e))?;

        if response.status().is_success() {
            debug!("Session renewed");
            Ok(())
        } else {
            warn!("Session renewal rejected with status {}", response.status());
            Err(ApiError::session_expired())
        }
    }

    /// Joins an API-relative path onto the base URL, tolerating both a
    /// trailing slash on the base and a leading slash on the path.
    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
