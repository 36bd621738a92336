//! Data models representing database entities and wire formats.
//!
//! This module contains the persisted records, the request/response bodies
//! of the HTTP API, and the payloads exchanged with the Plaid API.

/// Salted API key record
pub mod key_record;
/// Linked bank credential record
pub mod access_token;
/// Plaid request/response payloads
pub mod plaid;
/// HTTP request and response bodies
pub mod requests;
