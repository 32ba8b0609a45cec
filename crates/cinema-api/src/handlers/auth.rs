//! Session handlers
//!
//! Endpoints for registration, login, token refresh, and logout.

use axum::{extract::State, Json};
use cinema_service::{
    AuthResponse, LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest,
    SessionService,
};

use crate::extractors::{AuthMember, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Register a new member
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let service = SessionService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = SessionService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Rotate a refresh token
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = SessionService::new(state.service_context());
    let response = service.refresh(request).await?;
    Ok(Json(response))
}

/// Revoke one refresh token. Always 204, even for unknown tokens.
///
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LogoutRequest>,
) -> ApiResult<NoContent> {
    SessionService::new(state.service_context())
        .logout(request)
        .await?;
    Ok(NoContent)
}

/// Revoke every session of the caller
///
/// POST /auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthMember,
) -> ApiResult<NoContent> {
    SessionService::new(state.service_context())
        .logout_all(auth.member_id)
        .await?;
    Ok(NoContent)
}
