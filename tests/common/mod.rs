//! Common test utilities
//!
//! In-memory stand-ins for the key store, the token repository and the
//! Plaid client. Each records how often it was touched so tests can assert
//! that rejected requests caused no side effects.
//!
//! `setup_test_db` connects to the database named by `DATABASE_URL` for the
//! tests that exercise the real SQL.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use penny_pilot_api::{
    AppState,
    config::DatabaseConfig,
    db,
    models::{
        access_token::{AccessCredential, NewAccessCredential},
        key_record::{KeyRecord, NewKeyRecord},
        plaid::{LinkTokenResponse, PublicTokenExchangeResponse, RemoteTransaction},
    },
    routes,
    services::{
        key_store::KeyStore,
        plaid_client::{FinancialClient, PlaidError},
        token_repository::TokenRepository,
        transaction_service::TransactionWindow,
    },
};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::util::ServiceExt;

pub const VALID_KEY: &str = "dev-test-key";
pub const EXCHANGED_ACCESS_TOKEN: &str = "tok-abc";
pub const EXCHANGED_ITEM_ID: &str = "item-1";

/// Connect to `DATABASE_URL` and apply migrations.
///
/// Returns `None` when no database is configured so the Postgres tests
/// can be skipped on machines without one. Tables are not truncated; tests
/// use unique ids instead so they can run in parallel.
pub async fn setup_test_db() -> Option<PgPool> {
    let Ok(config) = DatabaseConfig::from_env() else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return None;
    };

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to DB");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Identifier that no other test run will reuse.
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, hex::encode(rand::random::<[u8; 8]>()))
}

#[derive(Default)]
pub struct MemoryKeyStore {
    records: Mutex<Vec<KeyRecord>>,
    pub fail_reads: AtomicBool,
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn insert(&self, record: NewKeyRecord) -> Result<KeyRecord, sqlx::Error> {
        let mut records = self.records.lock().unwrap();
        let stored = KeyRecord {
            id: records.len() as i64 + 1,
            salt: record.salt,
            hashed_key: record.hashed_key,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn all(&self) -> Result<Vec<KeyRecord>, sqlx::Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.records.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryTokenRepository {
    rows: Mutex<Vec<AccessCredential>>,
    next_id: AtomicI64,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub fail_writes: AtomicBool,
}

impl MemoryTokenRepository {
    pub fn rows(&self) -> Vec<AccessCredential> {
        self.rows.lock().unwrap().clone()
    }

    /// Insert a credential directly, bypassing the counters.
    pub fn seed(&self, user_id: &str, access_token: &str, item_id: &str) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().unwrap().push(AccessCredential {
            id,
            user_id: user_id.to_string(),
            access_token: access_token.to_string(),
            item_id: item_id.to_string(),
        });
    }

    pub fn touched(&self) -> usize {
        self.reads.load(Ordering::SeqCst) + self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn find(&self, user_id: &str) -> Result<Option<AccessCredential>, sqlx::Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.user_id == user_id)
            .cloned())
    }

    async fn create(
        &self,
        credential: NewAccessCredential,
    ) -> Result<AccessCredential, sqlx::Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }

        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|row| row.user_id == credential.user_id) {
            existing.access_token = credential.access_token;
            existing.item_id = credential.item_id;
            return Ok(existing.clone());
        }

        let stored = AccessCredential {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: credential.user_id,
            access_token: credential.access_token,
            item_id: credential.item_id,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, credential: &AccessCredential) -> Result<(), sqlx::Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        self.rows.lock().unwrap().retain(|row| row.id != credential.id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

#[derive(Default)]
pub struct StubPlaid {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    pub transactions: Mutex<Vec<RemoteTransaction>>,
    pub last_access_token: Mutex<Option<String>>,
    pub last_window: Mutex<Option<TransactionWindow>>,
}

impl StubPlaid {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, access_token: Option<&str>) -> Result<(), PlaidError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = access_token {
            *self.last_access_token.lock().unwrap() = Some(token.to_string());
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(PlaidError::Api {
                status: 400,
                error_type: "INVALID_INPUT".to_string(),
                error_code: "INVALID_PUBLIC_TOKEN".to_string(),
                error_message: "provided public token is expired".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FinancialClient for StubPlaid {
    async fn create_link_token(&self, user_id: &str) -> Result<LinkTokenResponse, PlaidError> {
        self.enter(None)?;
        Ok(LinkTokenResponse {
            link_token: format!("link-sandbox-{}", user_id),
            expiration: "2025-12-21T20:00:00Z".to_string(),
            request_id: "req-1".to_string(),
        })
    }

    async fn exchange_public_token(
        &self,
        _public_token: &str,
    ) -> Result<PublicTokenExchangeResponse, PlaidError> {
        self.enter(None)?;
        Ok(PublicTokenExchangeResponse {
            access_token: EXCHANGED_ACCESS_TOKEN.to_string(),
            item_id: EXCHANGED_ITEM_ID.to_string(),
        })
    }

    async fn get_accounts(&self, access_token: &str) -> Result<Vec<Value>, PlaidError> {
        self.enter(Some(access_token))?;
        Ok(vec![json!({
            "account_id": "acc-1",
            "name": "Plaid Checking",
            "type": "depository",
            "subtype": "checking"
        })])
    }

    async fn get_transactions(
        &self,
        access_token: &str,
        window: &TransactionWindow,
    ) -> Result<Vec<RemoteTransaction>, PlaidError> {
        self.enter(Some(access_token))?;
        *self.last_window.lock().unwrap() = Some(window.clone());
        Ok(self.transactions.lock().unwrap().clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub keys: Arc<MemoryKeyStore>,
    pub repo: Arc<MemoryTokenRepository>,
    pub plaid: Arc<StubPlaid>,
}

/// Router wired to real stores.
pub struct RouterApp {
    pub router: Router,
}

/// Build the router over fresh fakes with `VALID_KEY` provisioned.
pub async fn spawn_app() -> TestApp {
    let keys = Arc::new(MemoryKeyStore::default());
    keys.store_key(VALID_KEY).await.unwrap();

    let repo = Arc::new(MemoryTokenRepository::default());
    let plaid = Arc::new(StubPlaid::default());

    let state = AppState::new(keys.clone(), repo.clone(), plaid.clone());

    TestApp {
        router: routes::router(state),
        keys,
        repo,
        plaid,
    }
}

impl TestApp {
    /// Send a request and decode the JSON response body (`Null` when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }
}

impl RouterApp {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = key {
        builder = builder.header("key", key);
    }
    builder.body(Body::empty()).unwrap()
}
