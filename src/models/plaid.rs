//! Plaid API payloads.
//!
//! Request bodies are serialized without credentials; the client adds
//! `client_id` and `secret` when it sends them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `POST /link/token/create`.
#[derive(Debug, Serialize)]
pub struct LinkTokenCreateRequest {
    pub client_name: String,
    pub country_codes: Vec<String>,
    pub language: String,
    pub products: Vec<String>,
    pub user: LinkTokenUser,
}

#[derive(Debug, Serialize)]
pub struct LinkTokenUser {
    pub client_user_id: String,
}

impl LinkTokenCreateRequest {
    /// Link request for a US user enabling the `auth` and `transactions` products.
    pub fn for_user(client_name: &str, user_id: &str) -> Self {
        Self {
            client_name: client_name.to_string(),
            country_codes: vec!["US".to_string()],
            language: "en".to_string(),
            products: vec!["auth".to_string(), "transactions".to_string()],
            user: LinkTokenUser {
                client_user_id: user_id.to_string(),
            },
        }
    }
}

/// Response of `POST /link/token/create`, forwarded to the caller unchanged.
///
/// # JSON Example
///
/// ```json
/// {
///   "link_token": "link-sandbox-af1a0311-da53-4636-b754-dd15cc058176",
///   "expiration": "2025-12-21T20:00:00Z",
///   "request_id": "XQVgFigpGHXkb0b"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTokenResponse {
    pub link_token: String,
    pub expiration: String,
    #[serde(default)]
    pub request_id: String,
}

/// Body of `POST /item/public_token/exchange`.
#[derive(Serialize)]
pub struct PublicTokenExchangeRequest {
    pub public_token: String,
}

/// Response of `POST /item/public_token/exchange`.
///
/// Holds a live access token, so it has no `Debug` or `Serialize` impl.
#[derive(Deserialize)]
pub struct PublicTokenExchangeResponse {
    pub access_token: String,
    pub item_id: String,
}

/// Body of `POST /accounts/get`.
#[derive(Serialize)]
pub struct AccountsGetRequest {
    pub access_token: String,
}

/// Response of `POST /accounts/get`. Accounts are passed through as-is.
#[derive(Debug, Deserialize)]
pub struct AccountsGetResponse {
    pub accounts: Vec<serde_json::Value>,
}

/// Body of `POST /transactions/get`.
#[derive(Serialize)]
pub struct TransactionsGetRequest {
    pub access_token: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub options: TransactionsGetOptions,
}

#[derive(Debug, Serialize)]
pub struct TransactionsGetOptions {
    pub count: u32,
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_ids: Option<Vec<String>>,
}

/// Response of `POST /transactions/get`.
#[derive(Debug, Deserialize)]
pub struct TransactionsGetResponse {
    pub transactions: Vec<RemoteTransaction>,
}

/// One transaction as reported by Plaid.
///
/// Only `amount` is interpreted: positive values are money leaving the
/// account, negative values are money coming in. Every other field is kept
/// verbatim and returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTransaction {
    pub amount: f64,

    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl RemoteTransaction {
    /// Transaction with no fields besides the amount.
    pub fn with_amount(amount: f64) -> Self {
        Self {
            amount,
            details: serde_json::Map::new(),
        }
    }
}

/// Error body returned by Plaid on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct PlaidErrorBody {
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub error_message: String,
}
