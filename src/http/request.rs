//! Per-call request descriptors and query-string building.

use std::fmt;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;

/// A single query-string value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(v) => write!(f, "{}", v),
            QueryValue::Int(v) => write!(f, "{}", v),
            QueryValue::UInt(v) => write!(f, "{}", v),
            QueryValue::Float(v) => write!(f, "{}", v),
            QueryValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Str(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Str(v)
    }
}

impl From<i32> for QueryValue {
    fn from(v: i32) -> Self {
        QueryValue::Int(v.into())
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        QueryValue::UInt(v.into())
    }
}

impl From<u64> for QueryValue {
    fn from(v: u64) -> Self {
        QueryValue::UInt(v)
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        QueryValue::Float(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

/// Flat key-to-scalar query mapping.
///
/// Absent optional values are omitted entirely rather than serialized as a
/// literal placeholder, so callers can pass optional filters
/// unconditionally via [`Query::set_opt`].
#[derive(Debug, Clone, Default)]
pub struct Query(Vec<(String, QueryValue)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query entry.
    pub fn set(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.0.push((key.to_string(), value.into()));
        self
    }

    /// Appends a query entry when the value is present; `None` is skipped.
    pub fn set_opt(self, key: &str, value: Option<impl Into<QueryValue>>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key/value pairs in the shape reqwest's query serializer expects.
    pub(crate) fn pairs(&self) -> Vec<(&str, String)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.to_string()))
            .collect()
    }
}

/// Resolved descriptor for a single logical request.
///
/// Constructed fresh per call and never mutated after submission.
/// `max_retries` and `retry_delay` fall back to the client's configured
/// defaults when unset.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub query: Query,
    pub headers: HeaderMap,
    /// Suppresses the automatic 401-refresh-retry behavior for this call.
    pub skip_refresh: bool,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            query: Query::new(),
            headers: HeaderMap::new(),
            skip_refresh: false,
            max_retries: None,
            retry_delay: None,
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Serializes `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(|e| ApiError::encoding(&e))?);
        Ok(self)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Merges an extra header over the defaults.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn skip_refresh(mut self) -> Self {
        self.skip_refresh = true;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = Some(retry_delay);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_query_set_opt_skips_none() {
        let query = Query::new()
            .set("a", "1")
            .set_opt("b", None::<&str>)
            .set_opt("c", Some(7u32));

        let pairs = query.pairs();
        assert_eq!(
            pairs,
            vec![("a", "1".to_string()), ("c", "7".to_string())]
        );
    }

    #[test]
    fn test_query_value_rendering() {
        let query = Query::new()
            .set("search", "pa system")
            .set("page", 2u32)
            .set("overdue", true)
            .set("rate", 19.5);

        let pairs = query.pairs();
        assert_eq!(pairs[0].1, "pa system");
        assert_eq!(pairs[1].1, "2");
        assert_eq!(pairs[2].1, "true");
        assert_eq!(pairs[3].1, "19.5");
    }

    #[test]
    fn test_empty_query() {
        assert!(Query::new().is_empty());
        assert!(!Query::new().set("a", 1).is_empty());
    }

    #[test]
    fn test_default_options() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert!(!options.skip_refresh);
        assert_eq!(options.max_retries, None);
        assert_eq!(options.retry_delay, None);
    }

    #[test]
    fn test_json_body() {
        #[derive(Serialize)]
        struct Payload {
            name: &'static str,
        }

        let options = RequestOptions::post().json(&Payload { name: "rig" }).unwrap();
        assert_eq!(options.body.unwrap()["name"], "rig");
    }

    #[test]
    fn test_builder_chain() {
        let options = RequestOptions::patch()
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer t"))
            .skip_refresh()
            .max_retries(2)
            .retry_delay(Duration::from_millis(50));

        assert_eq!(options.method, Method::PATCH);
        assert!(options.headers.contains_key(AUTHORIZATION));
        assert!(options.skip_refresh);
        assert_eq!(options.max_retries, Some(2));
        assert_eq!(options.retry_delay, Some(Duration::from_millis(50)));
    }
}
