//! HTTP router.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, middleware, state::AppState};

/// Build the application router.
///
/// # Routes
///
/// - `GET /health` - public
/// - `POST /api/create_link_token` - key in body
/// - `POST /api/exchange_public_token` - key in body
/// - `POST /api/remove_bank_account` - key in body
/// - `GET /api/linked_accounts/{user_id}` - key in header
/// - `GET /api/transactions` - key in header
///
/// Keys are checked inside each operation, not by a route layer, because
/// `POST` endpoints carry them in the body.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/create_link_token",
            post(handlers::link::create_link_token),
        )
        .route(
            "/exchange_public_token",
            post(handlers::link::exchange_public_token),
        )
        .route(
            "/remove_bank_account",
            post(handlers::link::remove_bank_account),
        )
        .route(
            "/linked_accounts/{user_id}",
            get(handlers::accounts::linked_accounts),
        )
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions),
        );

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(
            middleware::logging::logging_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        // The web client is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
