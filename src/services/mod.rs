//! Thin per-resource wrappers over [`ApiClient`](crate::http::ApiClient).
//!
//! Each wrapper is one mechanical call into the client core and carries no
//! logic of its own; the lifecycle rules for loans, billing, and inventory
//! live in the backend.

pub mod auth;
pub mod customers;
pub mod loans;

pub use auth::AuthApi;
pub use customers::CustomerApi;
pub use loans::LoanApi;
