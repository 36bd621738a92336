//! Linked bank credential lifecycle.
//!
//! This service handles:
//! - Link token creation for the client-side linking flow
//! - Public token exchange and credential storage
//! - Account and transaction listing with a stored credential
//! - Unlinking (credential deletion)
//!
//! # Ordering
//!
//! Every operation runs the access gate first, then validates its fields,
//! and only then touches the token repository or the financial data API.

use std::sync::Arc;

use chrono::Utc;

use crate::error::AppError;
use crate::models::access_token::{AccessCredential, NewAccessCredential};
use crate::models::plaid::LinkTokenResponse;
use crate::models::requests::{MessageResponse, TransactionsResponse};
use crate::services::access_gate::AccessGate;
use crate::services::plaid_client::{FinancialClient, PlaidError};
use crate::services::token_repository::TokenRepository;
use crate::services::transaction_service::{self, TransactionWindow};

/// Gated operations over users' linked bank credentials.
#[derive(Clone)]
pub struct TokenService {
    gate: AccessGate,
    tokens: Arc<dyn TokenRepository>,
    plaid: Arc<dyn FinancialClient>,
}

/// Return a required field unchanged, or `BadRequest` naming it when blank.
fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing {}", field)))
}

fn log_upstream(operation: &str, user_id: &str, error: &PlaidError) {
    tracing::error!(
        operation,
        user_id,
        timeout = error.is_timeout(),
        error = %error,
        "Financial data API call failed"
    );
}

fn log_storage(operation: &str, user_id: &str, error: &sqlx::Error) {
    tracing::error!(operation, user_id, error = %error, "Credential storage failed");
}

impl TokenService {
    pub fn new(
        gate: AccessGate,
        tokens: Arc<dyn TokenRepository>,
        plaid: Arc<dyn FinancialClient>,
    ) -> Self {
        Self {
            gate,
            tokens,
            plaid,
        }
    }

    /// Create a Link token for `user_id`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized`: key missing or invalid
    /// - `BadRequest`: `user_id` missing
    /// - `Upstream`: Plaid call failed
    pub async fn create_link_token(
        &self,
        key: Option<&str>,
        user_id: Option<String>,
    ) -> Result<LinkTokenResponse, AppError> {
        self.gate.require(key).await?;
        let user_id = required(user_id, "user_id")?;

        let link = self
            .plaid
            .create_link_token(&user_id)
            .await
            .inspect_err(|e| log_upstream("create_link_token", &user_id, e))?;

        tracing::info!(user_id = %user_id, "Link token created");
        Ok(link)
    }

    /// Exchange a public token and store the resulting credential.
    ///
    /// # Process
    ///
    /// 1. Check the key
    /// 2. Require `public_token` and `user_id`
    /// 3. Exchange the public token with Plaid
    /// 4. Store `{user_id, access_token, item_id}`, replacing any previous credential
    /// 5. Confirm without echoing the access token
    ///
    /// # Errors
    ///
    /// - `Unauthorized`, `BadRequest` before any side effect
    /// - `Upstream`: exchange failed, nothing stored
    /// - `Storage`: exchange succeeded but the credential was not stored; the
    ///   remote Item is orphaned and is logged with its `item_id`
    pub async fn exchange_public_token(
        &self,
        key: Option<&str>,
        public_token: Option<String>,
        user_id: Option<String>,
    ) -> Result<MessageResponse, AppError> {
        self.gate.require(key).await?;
        let public_token = required(public_token, "public_token")?;
        let user_id = required(user_id, "user_id")?;

        let exchange = self
            .plaid
            .exchange_public_token(&public_token)
            .await
            .inspect_err(|e| log_upstream("exchange_public_token", &user_id, e))?;

        let item_id = exchange.item_id.clone();
        let credential = NewAccessCredential {
            user_id: user_id.clone(),
            access_token: exchange.access_token,
            item_id: exchange.item_id,
        };

        if let Err(e) = self.tokens.create(credential).await {
            tracing::error!(
                operation = "exchange_public_token",
                user_id = %user_id,
                item_id = %item_id,
                error = %e,
                "Public token exchanged but credential was not stored; remote item is orphaned"
            );
            return Err(AppError::Storage(e));
        }

        tracing::info!(user_id = %user_id, item_id = %item_id, "Bank account linked");
        Ok(MessageResponse::new("Access token stored"))
    }

    /// List the accounts of the user's linked Item.
    ///
    /// # Errors
    ///
    /// - `Unauthorized`, `BadRequest`
    /// - `NotFound`: no credential for the user
    /// - `Upstream`, `Storage`
    pub async fn linked_accounts(
        &self,
        key: Option<&str>,
        user_id: Option<String>,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.gate.require(key).await?;
        let user_id = required(user_id, "user_id")?;

        let credential = self.credential_for(&user_id, "linked_accounts").await?;

        let accounts = self
            .plaid
            .get_accounts(&credential.access_token)
            .await
            .inspect_err(|e| log_upstream("linked_accounts", &user_id, e))?;

        Ok(accounts)
    }

    /// List transactions of the user's linked Item with income/expense totals.
    ///
    /// Dates are validated before the repository is read.
    ///
    /// # Errors
    ///
    /// - `Unauthorized`
    /// - `BadRequest`: `user_id` missing, malformed date, or inverted range
    /// - `NotFound`: no credential for the user
    /// - `Upstream`, `Storage`
    pub async fn transactions(
        &self,
        key: Option<&str>,
        user_id: Option<String>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        account_id: Option<String>,
    ) -> Result<TransactionsResponse, AppError> {
        self.gate.require(key).await?;
        let user_id = required(user_id, "user_id")?;
        let window = TransactionWindow::resolve(
            start_date,
            end_date,
            account_id,
            Utc::now().date_naive(),
        )?;

        let credential = self.credential_for(&user_id, "transactions").await?;

        let transactions = self
            .plaid
            .get_transactions(&credential.access_token, &window)
            .await
            .inspect_err(|e| log_upstream("transactions", &user_id, e))?;

        let analytics = transaction_service::summarize(&transactions);

        Ok(TransactionsResponse {
            transactions,
            analytics,
        })
    }

    /// Unlink the user's bank account by deleting the stored credential.
    ///
    /// # Errors
    ///
    /// - `Unauthorized`, `BadRequest`
    /// - `NotFound`: nothing linked (including a repeated call)
    /// - `Storage`
    pub async fn remove_bank_account(
        &self,
        key: Option<&str>,
        user_id: Option<String>,
    ) -> Result<MessageResponse, AppError> {
        self.gate.require(key).await?;
        let user_id = required(user_id, "user_id")?;

        let credential = self.credential_for(&user_id, "remove_bank_account").await?;

        self.tokens
            .delete(&credential)
            .await
            .inspect_err(|e| log_storage("remove_bank_account", &user_id, e))?;

        tracing::info!(user_id = %user_id, item_id = %credential.item_id, "Bank account unlinked");
        Ok(MessageResponse::new("Bank account removed"))
    }

    /// Check that credential storage is reachable.
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.tokens
            .ping()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Credential storage is unreachable"))?;

        Ok(())
    }

    async fn credential_for(
        &self,
        user_id: &str,
        operation: &str,
    ) -> Result<AccessCredential, AppError> {
        self.tokens
            .find(user_id)
            .await
            .inspect_err(|e| log_storage(operation, user_id, e))?
            .ok_or_else(|| {
                tracing::info!(operation, user_id, "No linked account for user");
                AppError::NotFound("No linked account for this user".to_string())
            })
    }
}
