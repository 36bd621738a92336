//! Linked bank credential model.
//!
//! This module defines:
//! - `AccessCredential`: Database entity holding a user's Plaid access token
//! - `NewAccessCredential`: Values for a credential about to be stored

use std::fmt;

/// Represents a linked bank credential from the database.
///
/// # Database Table
///
/// Maps to the `access_tokens` table. Each credential:
/// - Belongs to one user (via `user_id`, unique across the table)
/// - Holds the durable Plaid access token for one Item
///
/// # Ownership
///
/// Rows are only written and deleted through
/// [`TokenRepository`](crate::services::token_repository::TokenRepository).
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AccessCredential {
    /// Surrogate key
    pub id: i64,

    /// Opaque identifier of the user that linked the account
    ///
    /// Supplied by the caller. Not a foreign key.
    pub user_id: String,

    /// Durable secret issued by Plaid
    ///
    /// Never returned to API clients and never logged.
    pub access_token: String,

    /// Plaid identifier of the linked institution connection
    pub item_id: String,
}

// The access token is a live credential; keep it out of debug output.
impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .field("item_id", &self.item_id)
            .finish()
    }
}

/// Values for a credential produced by a successful public token exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccessCredential {
    pub user_id: String,
    pub access_token: String,
    pub item_id: String,
}

impl fmt::Debug for NewAccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccessCredential")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .field("item_id", &self.item_id)
            .finish()
    }
}
