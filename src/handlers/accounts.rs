//! Linked account HTTP handler.
//!
//! - GET /api/linked_accounts/{user_id} - List accounts of the user's linked Item

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{error::AppError, middleware::auth::HeaderKey, state::AppState};

/// List the bank accounts linked by a user.
///
/// # Authentication
///
/// Requires a valid API key in the `key` header.
///
/// # Response
///
/// - **Success (200 OK)**: Array of Plaid account objects
/// - **Error (403)**: Invalid API key
/// - **Error (404)**: User has no linked bank account
/// - **Error (500)**: Plaid or database error
///
/// ```json
/// [
///   {
///     "account_id": "BxBXxLj1m4HMXBm9WZZmCWVbPjX16EHwv99vp",
///     "name": "Plaid Checking",
///     "mask": "0000",
///     "type": "depository",
///     "subtype": "checking",
///     "balances": { "available": 100, "current": 110, "iso_currency_code": "USD" }
///   }
/// ]
/// ```
pub async fn linked_accounts(
    State(state): State<AppState>,
    key: HeaderKey,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<serde_json::Value>>, AppError> {
    let accounts = state
        .tokens
        .linked_accounts(key.as_deref(), Some(user_id))
        .await?;

    Ok(Json(accounts))
}
