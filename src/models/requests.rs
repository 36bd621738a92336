//! HTTP request and response bodies.
//!
//! Every request field is optional at the deserialization layer so that
//! the key check always runs before field validation, and missing fields
//! surface as typed `BadRequest` errors instead of extractor rejections.

use serde::{Deserialize, Serialize};

use super::plaid::RemoteTransaction;

/// Request body for `POST /api/create_link_token`.
///
/// ```json
/// { "key": "dev-test-key", "user_id": "firebase-uid-123" }
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateLinkTokenRequest {
    pub key: Option<String>,
    pub user_id: Option<String>,
}

/// Request body for `POST /api/exchange_public_token`.
///
/// ```json
/// {
///   "key": "dev-test-key",
///   "public_token": "public-sandbox-b0e2c4ee-a763-4df5-bfe9-46a46bce993d",
///   "user_id": "firebase-uid-123"
/// }
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExchangePublicTokenRequest {
    pub key: Option<String>,
    pub public_token: Option<String>,
    pub user_id: Option<String>,
}

/// Request body for `POST /api/remove_bank_account`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RemoveBankAccountRequest {
    pub key: Option<String>,
    pub user_id: Option<String>,
}

/// Query string of `GET /api/transactions`.
///
/// Dates use `YYYY-MM-DD`. `end_date` defaults to today and `start_date`
/// to 30 days before `end_date`.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    pub user_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub account_id: Option<String>,
}

/// Plain confirmation returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Response of `GET /api/transactions`.
///
/// # JSON Example
///
/// ```json
/// {
///   "transactions": [ { "amount": -50.0, "name": "Payroll" } ],
///   "analytics": {
///     "totalIncome": 50.0,
///     "totalExpenses": 0.0,
///     "totalSavings": 0.0,
///     "categoryBreakdown": [],
///     "monthlyTrend": []
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<RemoteTransaction>,
    pub analytics: TransactionAnalytics,
}

/// Totals derived from one page of transactions.
///
/// `categoryBreakdown` and `monthlyTrend` are always empty; they are
/// filled by a downstream analytics consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAnalytics {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub category_breakdown: Vec<serde_json::Value>,
    pub monthly_trend: Vec<serde_json::Value>,
}
