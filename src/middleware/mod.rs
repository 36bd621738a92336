//! HTTP middleware components.
//!
//! - `auth`: extraction of the API key presented in the `key` header
//! - `logging`: request/response logging with sensitive headers masked

/// API key header extraction
pub mod auth;
/// Request logging middleware
pub mod logging;
