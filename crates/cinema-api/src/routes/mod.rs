//! Route definitions
//!
//! API routes are mounted under /api/v1. Health routes sit outside the
//! rate limiter.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, members, password_reset};
use crate::state::AppState;

/// Create the main API router (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(password_reset_routes())
        .merge(member_routes())
}

/// Session routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/logout-all", post(auth::logout_all))
}

/// Password reset routes
fn password_reset_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/password-reset/request",
            post(password_reset::request_reset),
        )
        .route("/auth/password-reset/verify", post(password_reset::verify_otp))
        .route(
            "/auth/password-reset/complete",
            post(password_reset::change_password),
        )
}

/// Member routes
fn member_routes() -> Router<AppState> {
    Router::new().route("/members/@me", get(members::get_current_member))
}
