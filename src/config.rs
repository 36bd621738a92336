//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;
use std::time::Duration;

/// Plaid deployment the remote client talks to.
///
/// Deserialized from the lowercase `PLAID_ENV` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaidEnvironment {
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    /// Base URL of the Plaid REST API for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            PlaidEnvironment::Sandbox => "https://sandbox.plaid.com",
            PlaidEnvironment::Development => "https://development.plaid.com",
            PlaidEnvironment::Production => "https://production.plaid.com",
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `PLAID_CLIENT_ID` (required): Plaid client id
/// - `PLAID_SECRET` (required): Plaid secret for the selected environment
/// - `PLAID_ENV` (optional): `sandbox`, `development` or `production`, defaults to `sandbox`
/// - `PLAID_TIMEOUT_SECS` (optional): timeout for each Plaid request, defaults to 10
/// - `LINK_CLIENT_NAME` (optional): name shown in the Link flow, defaults to `PennyPilot`
#[derive(Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    pub plaid_client_id: String,

    pub plaid_secret: String,

    #[serde(default = "default_plaid_env")]
    pub plaid_env: PlaidEnvironment,

    #[serde(default = "default_plaid_timeout_secs")]
    pub plaid_timeout_secs: u64,

    #[serde(default = "default_link_client_name")]
    pub link_client_name: String,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_plaid_env() -> PlaidEnvironment {
    PlaidEnvironment::Sandbox
}

fn default_plaid_timeout_secs() -> u64 {
    10
}

fn default_link_client_name() -> String {
    "PennyPilot".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL, PLAID_SECRET)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: plaid_client_id -> PLAID_CLIENT_ID
        envy::from_env::<Config>()
    }

    /// Timeout applied to every request sent to Plaid.
    pub fn plaid_timeout(&self) -> Duration {
        Duration::from_secs(self.plaid_timeout_secs)
    }
}

/// Database-only configuration for tools that never talk to Plaid.
///
/// Reads `DATABASE_URL` the same way [`Config`] does, without requiring the
/// Plaid credentials.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub database_url: String,
}

impl DatabaseConfig {
    /// Load `DATABASE_URL` from the environment or a `.env` file.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<DatabaseConfig>()
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("plaid_env", &self.plaid_env)
            .field("plaid_timeout_secs", &self.plaid_timeout_secs)
            .field("link_client_name", &self.link_client_name)
            .finish_non_exhaustive()
    }
}
