//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! Each collaborator behind a trait (`KeyStore`, `TokenRepository`,
//! `FinancialClient`) is injected at startup.

pub mod access_gate;
pub mod key_store;
pub mod plaid_client;
pub mod token_repository;
pub mod token_service;
pub mod transaction_service;
