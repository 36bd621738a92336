//! Transaction window resolution and summary totals.
//!
//! Plaid reports outflows as positive amounts and inflows as negative
//! amounts. Totals follow that convention:
//! - `totalIncome` is the absolute sum of negative amounts
//! - `totalExpenses` is the sum of positive amounts

use chrono::{Duration, NaiveDate};

use crate::error::AppError;
use crate::models::plaid::RemoteTransaction;
use crate::models::requests::TransactionAnalytics;

/// Accepted date format for query parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the default window ending at `end_date`.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Date range and optional account filter for a transaction listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub account_id: Option<String>,
}

impl TransactionWindow {
    /// Build a window from raw query values.
    ///
    /// # Defaults
    ///
    /// - `end_date`: `today`
    /// - `start_date`: 30 days before `end_date`
    ///
    /// Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// - `BadRequest` if a date is not `YYYY-MM-DD`
    /// - `BadRequest` if `start_date` is after `end_date`
    /// - `BadRequest` if `end_date` is too early to fit the default window
    pub fn resolve(
        start_date: Option<&str>,
        end_date: Option<&str>,
        account_id: Option<String>,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let end_date = match non_empty(end_date) {
            Some(raw) => parse_date(raw)?,
            None => today,
        };
        let start_date = match non_empty(start_date) {
            Some(raw) => parse_date(raw)?,
            None => end_date
                .checked_sub_signed(Duration::days(DEFAULT_WINDOW_DAYS))
                .ok_or_else(|| AppError::bad_request("end_date is out of range"))?,
        };

        if start_date > end_date {
            return Err(AppError::bad_request(
                "start_date must not be after end_date",
            ));
        }

        Ok(Self {
            start_date,
            end_date,
            account_id: account_id.filter(|id| !id.trim().is_empty()),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| AppError::bad_request("Invalid date format. Use YYYY-MM-DD."))
}

/// Compute income and expense totals over a set of transactions.
///
/// Savings, category breakdown and monthly trend are left empty.
pub fn summarize(transactions: &[RemoteTransaction]) -> TransactionAnalytics {
    let income: f64 = transactions
        .iter()
        .map(|t| t.amount)
        .filter(|amount| *amount < 0.0)
        .sum();
    let expenses: f64 = transactions
        .iter()
        .map(|t| t.amount)
        .filter(|amount| *amount > 0.0)
        .sum();

    TransactionAnalytics {
        total_income: income.abs(),
        total_expenses: expenses,
        total_savings: 0.0,
        category_breakdown: Vec::new(),
        monthly_trend: Vec::new(),
    }
}
