//! Typed HTTP client for the Rentora event-equipment rental platform API.
//!
//! All traffic goes through [`http::ApiClient`]: session cookies are
//! attached automatically, responses follow a single envelope contract,
//! transient failures are retried with exponential backoff, and an expired
//! session is renewed transparently through a single-flight refresh. The
//! [`services`] modules are thin per-resource wrappers over the client.

pub mod config;
pub mod http;
pub mod services;

pub use config::ClientConfig;
pub use http::{ApiClient, ApiError, ApiSuccess, Envelope, Query, RequestOptions};
