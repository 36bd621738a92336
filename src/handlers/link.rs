//! Bank linking HTTP handlers.
//!
//! This module implements the linking lifecycle endpoints:
//! - POST /api/create_link_token - Start a Link flow
//! - POST /api/exchange_public_token - Store the credential for a finished Link flow
//! - POST /api/remove_bank_account - Unlink the user's bank account
//!
//! All three read the API key from the `key` field of the JSON body.

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    models::{
        plaid::LinkTokenResponse,
        requests::{
            CreateLinkTokenRequest, ExchangePublicTokenRequest, MessageResponse,
            RemoveBankAccountRequest,
        },
    },
    state::AppState,
};

/// Create a Link token for a user.
///
/// # Request Body
///
/// ```json
/// { "key": "dev-test-key", "user_id": "firebase-uid-123" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: Plaid's link token payload
/// - **Error (403)**: Invalid API key
/// - **Error (400)**: Missing user_id
/// - **Error (500)**: Plaid error
pub async fn create_link_token(
    State(state): State<AppState>,
    Json(request): Json<CreateLinkTokenRequest>,
) -> Result<Json<LinkTokenResponse>, AppError> {
    let link = state
        .tokens
        .create_link_token(request.key.as_deref(), request.user_id)
        .await?;

    Ok(Json(link))
}

/// Exchange a public token for a stored access credential.
///
/// # Request Body
///
/// ```json
/// {
///   "key": "dev-test-key",
///   "public_token": "public-sandbox-...",
///   "user_id": "firebase-uid-123"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{"message": "Access token stored"}`
/// - **Error (403)**: Invalid API key
/// - **Error (400)**: Missing public_token or user_id
/// - **Error (500)**: Plaid or database error
///
/// # Security Note
///
/// The access token is stored server-side only and never included in the response.
pub async fn exchange_public_token(
    State(state): State<AppState>,
    Json(request): Json<ExchangePublicTokenRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let confirmation = state
        .tokens
        .exchange_public_token(request.key.as_deref(), request.public_token, request.user_id)
        .await?;

    Ok(Json(confirmation))
}

/// Remove the user's linked bank account.
///
/// # Response
///
/// - **Success (200 OK)**: `{"message": "Bank account removed"}`
/// - **Error (403)**: Invalid API key
/// - **Error (404)**: No linked account for this user
/// - **Error (500)**: Database error
pub async fn remove_bank_account(
    State(state): State<AppState>,
    Json(request): Json<RemoveBankAccountRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let confirmation = state
        .tokens
        .remove_bank_account(request.key.as_deref(), request.user_id)
        .await?;

    Ok(Json(confirmation))
}
