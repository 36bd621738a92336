//! Transaction HTTP handler.
//!
//! - GET /api/transactions - List a user's transactions with income/expense totals

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    error::AppError,
    middleware::auth::HeaderKey,
    models::requests::{TransactionsQuery, TransactionsResponse},
    state::AppState,
};

/// List transactions from the user's linked bank account.
///
/// # Authentication
///
/// Requires a valid API key in the `key` header.
///
/// # Query Parameters
///
/// - `user_id` (required)
/// - `start_date`, `end_date` (optional, `YYYY-MM-DD`, default: last 30 days)
/// - `account_id` (optional, restricts to one account)
///
/// # Response (200)
///
/// ```json
/// {
///   "transactions": [ { "amount": 12.5, "name": "Coffee", "date": "2025-01-03" } ],
///   "analytics": {
///     "totalIncome": 0.0,
///     "totalExpenses": 12.5,
///     "totalSavings": 0.0,
///     "categoryBreakdown": [],
///     "monthlyTrend": []
///   }
/// }
/// ```
///
/// # Errors
///
/// - **403**: Invalid API key
/// - **400**: Missing user_id or bad date
/// - **404**: No linked bank account
/// - **500**: Plaid or database error
pub async fn list_transactions(
    State(state): State<AppState>,
    key: HeaderKey,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let response = state
        .tokens
        .transactions(
            key.as_deref(),
            query.user_id,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            query.account_id,
        )
        .await?;

    Ok(Json(response))
}
