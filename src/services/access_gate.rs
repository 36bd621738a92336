//! Access gate for every sensitive operation.
//!
//! The gate runs before any credential is read or written and before any
//! call to the financial data API. It fails closed: a key store that cannot
//! be read denies the request.

use std::sync::Arc;

use crate::error::AppError;
use crate::services::key_store::KeyStore;

/// Outcome of checking a presented key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Granted,
    Denied,
}

/// Guard that validates presented API keys against the key store.
#[derive(Clone)]
pub struct AccessGate {
    keys: Arc<dyn KeyStore>,
}

impl AccessGate {
    pub fn new(keys: Arc<dyn KeyStore>) -> Self {
        Self { keys }
    }

    /// Check a presented key.
    ///
    /// # Flow
    ///
    /// 1. Absent or empty key → `Denied` (the key store is not consulted)
    /// 2. Key matches a stored record → `Granted`
    /// 3. No match → `Denied`
    /// 4. Key store read failure → logged as a storage failure, `Denied`
    pub async fn authorize(&self, presented: Option<&str>) -> Authorization {
        let Some(key) = presented.filter(|key| !key.is_empty()) else {
            return Authorization::Denied;
        };

        match self.keys.validate_key(key).await {
            Ok(true) => Authorization::Granted,
            Ok(false) => Authorization::Denied,
            Err(e) => {
                tracing::error!(error = %e, "Key store read failed, denying request");
                Authorization::Denied
            }
        }
    }

    /// Like [`authorize`](Self::authorize), mapping `Denied` to `AppError::Unauthorized`.
    pub async fn require(&self, presented: Option<&str>) -> Result<(), AppError> {
        match self.authorize(presented).await {
            Authorization::Granted => Ok(()),
            Authorization::Denied => Err(AppError::Unauthorized),
        }
    }
}
