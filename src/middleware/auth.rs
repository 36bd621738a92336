//! API key extraction for `GET` endpoints.
//!
//! `GET` endpoints carry the key in a `key` header; `POST` endpoints carry it
//! in the JSON body. Extraction never rejects: a missing or non-UTF-8 header
//! yields `None`, and the access gate inside each operation decides.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Name of the header carrying the API key.
pub const KEY_HEADER: &str = "key";

/// API key presented in the `key` header, if any.
#[derive(Debug, Clone, Default)]
pub struct HeaderKey(pub Option<String>);

impl HeaderKey {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for HeaderKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(KEY_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Ok(HeaderKey(key))
    }
}
