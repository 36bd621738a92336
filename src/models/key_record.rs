//! API key model for request authorization.
//!
//! Keys are administrative secrets shared with trusted clients. They are stored
//! as salted SHA-256 digests; the plaintext key never reaches the database.

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `keys` table with columns:
/// - `id`: Surrogate key
/// - `salt`: Random hex string generated for this record
/// - `hashed_key`: SHA-256 digest of `salt || key`, hex encoded
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct KeyRecord {
    /// Unique identifier for this key record
    pub id: i64,

    /// Per-record salt (32 hex characters)
    pub salt: String,

    /// SHA-256 digest of the salt followed by the plaintext key (64 hex characters)
    ///
    /// When a request presents "abc123", we:
    /// 1. Hash this record's salt followed by "abc123"
    /// 2. Compare the result against this field
    pub hashed_key: String,
}

/// A key record that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewKeyRecord {
    pub salt: String,
    pub hashed_key: String,
}
