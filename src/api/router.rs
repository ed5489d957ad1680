use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth;
use super::health;
use super::state::AppState;
use super::users;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        // Login and password change (no token required)
        .nest("/auth", auth::create_auth_router())
        // User CRUD; reads and mutations are token-gated, registration is open
        .nest("/usuarios", users::create_users_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
