//! PennyPilot API - Main Application Entry Point
//!
//! Backend for linking users' bank accounts through Plaid. Every sensitive
//! endpoint is gated by an administrative API key stored as a salted hash.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: API key with salted SHA-256 hashing
//! - **Financial data**: Plaid REST API via reqwest
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the Plaid client and wire services
//! 5. Start server on configured port

use std::sync::Arc;

use penny_pilot_api::{
    AppState, Config, db, routes,
    services::{
        key_store::PgKeyStore, plaid_client::PlaidClient, token_repository::PgTokenRepository,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(plaid_env = ?config.plaid_env, "Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let plaid = PlaidClient::from_config(&config)?;

    let state = AppState::new(
        Arc::new(PgKeyStore::new(pool.clone())),
        Arc::new(PgTokenRepository::new(pool.clone())),
        Arc::new(plaid),
    );

    let app = routes::router(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
