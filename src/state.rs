//! Shared application state.

use std::sync::Arc;

use crate::services::access_gate::AccessGate;
use crate::services::key_store::KeyStore;
use crate::services::plaid_client::FinancialClient;
use crate::services::token_repository::TokenRepository;
use crate::services::token_service::TokenService;

/// State handed to every handler via `State` extraction.
///
/// Built once in `main` (or in tests with fakes); cloning only bumps
/// reference counts.
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
}

impl AppState {
    /// Wire the services from their collaborators.
    pub fn new(
        keys: Arc<dyn KeyStore>,
        repository: Arc<dyn TokenRepository>,
        plaid: Arc<dyn FinancialClient>,
    ) -> Self {
        let gate = AccessGate::new(keys);

        Self {
            tokens: TokenService::new(gate, repository, plaid),
        }
    }
}
