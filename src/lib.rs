//! PennyPilot API library.
//!
//! Re-exports modules for the server binary, the key provisioning tool and
//! integration tests.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;
