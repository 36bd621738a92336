//! HTTP request handlers (route handlers).
//!
//! Handlers only extract request data and delegate to
//! [`TokenService`](crate::services::token_service::TokenService), which
//! owns authorization, validation and error mapping.

/// Linked account listing
pub mod accounts;
/// Service health
pub mod health;
/// Link token, public token exchange and unlink endpoints
pub mod link;
/// Transaction listing
pub mod transactions;
