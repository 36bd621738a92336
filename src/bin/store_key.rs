//! API key provisioning tool.
//!
//! Run with: cargo run --bin store_key -- <KEY>
//! or:       cargo run --bin store_key -- --dev
//!
//! Stores a salted hash of the key in the `keys` table. The key itself is
//! never written. Storing the same key twice creates two valid records.

use penny_pilot_api::{
    config::DatabaseConfig,
    db,
    services::key_store::{KeyStore, PgKeyStore},
};
use tracing_subscriber::EnvFilter;

/// Key used by local development clients.
const DEV_KEY: &str = "dev-test-key";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let key = match args.first().map(String::as_str) {
        Some("--dev") => DEV_KEY.to_string(),
        Some(key) if !key.is_empty() && !key.starts_with("--") => key.to_string(),
        _ => anyhow::bail!("usage: store_key <KEY> | store_key --dev"),
    };

    let config = DatabaseConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let record = PgKeyStore::new(pool.clone()).store_key(&key).await?;
    tracing::info!(key_id = record.id, "API key stored");

    pool.close().await;

    Ok(())
}
