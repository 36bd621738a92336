//! Salted API key storage and validation.
//!
//! Keys are hashed as `SHA-256(salt || key)` with a fresh 16-byte salt per
//! record. Validation walks every stored record, which is fine for the small
//! set of administrative keys this service expects.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::db::DbPool;
use crate::models::key_record::{KeyRecord, NewKeyRecord};

/// Number of random bytes in a salt (32 hex characters once encoded).
pub const SALT_BYTES: usize = 16;

/// Generate a cryptographically secure random salt.
///
/// # Output
///
/// 32 hex characters (16 random bytes)
pub fn generate_salt() -> String {
    let bytes: [u8; SALT_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Hash a plaintext key with the given salt.
///
/// Returns the hex encoded SHA-256 digest of the salt followed by the key.
pub fn hash_key(key: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(key.as_bytes());

    hex::encode(hasher.finalize())
}

impl KeyRecord {
    /// Whether `key` hashes to this record's digest under this record's salt.
    pub fn matches(&self, key: &str) -> bool {
        hash_key(key, &self.salt) == self.hashed_key
    }
}

/// Storage of salted key records.
///
/// Implementors only provide the two persistence primitives; storing and
/// validating keys are built on top of them.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Insert a new record and return it with its generated id.
    async fn insert(&self, record: NewKeyRecord) -> Result<KeyRecord, sqlx::Error>;

    /// Load every stored record.
    async fn all(&self) -> Result<Vec<KeyRecord>, sqlx::Error>;

    /// Store a new authorized key.
    ///
    /// Not idempotent: storing the same key twice creates two records, and
    /// both validate.
    async fn store_key(&self, key: &str) -> Result<KeyRecord, sqlx::Error> {
        let salt = generate_salt();
        let hashed_key = hash_key(key, &salt);

        self.insert(NewKeyRecord { salt, hashed_key }).await
    }

    /// Check a presented key against every stored record.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if any record matches
    /// - `Ok(false)` if the key is empty or nothing matches
    ///
    /// # Errors
    ///
    /// Returns the storage error when records cannot be read. Callers must
    /// treat that as "not validated".
    async fn validate_key(&self, key: &str) -> Result<bool, sqlx::Error> {
        if key.is_empty() {
            return Ok(false);
        }

        let records = self.all().await?;

        Ok(records.iter().any(|record| record.matches(key)))
    }
}

/// PostgreSQL-backed key store over the `keys` table.
#[derive(Debug, Clone)]
pub struct PgKeyStore {
    pool: DbPool,
}

impl PgKeyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyStore for PgKeyStore {
    async fn insert(&self, record: NewKeyRecord) -> Result<KeyRecord, sqlx::Error> {
        sqlx::query_as::<_, KeyRecord>(
            r#"
            INSERT INTO keys (salt, hashed_key)
            VALUES ($1, $2)
            RETURNING id, salt, hashed_key
            "#,
        )
        .bind(&record.salt)
        .bind(&record.hashed_key)
        .fetch_one(&self.pool)
        .await
    }

    async fn all(&self) -> Result<Vec<KeyRecord>, sqlx::Error> {
        sqlx::query_as::<_, KeyRecord>("SELECT id, salt, hashed_key FROM keys ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }
}
