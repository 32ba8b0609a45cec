//! Password reset handlers

use axum::{extract::State, Json};
use cinema_service::{
    ChangePasswordRequest, PasswordResetRequest, PasswordResetService, ResetRequestedResponse,
    VerifyOtpRequest, VerifyOtpResponse,
};

use crate::extractors::ValidatedJson;
use crate::response::{Accepted, ApiResult, NoContent};
use crate::state::AppState;

/// Send a reset code to the account's email
///
/// POST /auth/password-reset/request
pub async fn request_reset(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PasswordResetRequest>,
) -> ApiResult<Accepted<Json<ResetRequestedResponse>>> {
    let service = PasswordResetService::new(state.service_context());
    let response = service.request_reset(request).await?;
    Ok(Accepted(Json(response)))
}

/// Exchange a reset code for a proof token
///
/// POST /auth/password-reset/verify
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyOtpRequest>,
) -> ApiResult<Json<VerifyOtpResponse>> {
    let service = PasswordResetService::new(state.service_context());
    let response = service.verify_otp(request).await?;
    Ok(Json(response))
}

/// Set a new password with a proof token
///
/// POST /auth/password-reset/complete
pub async fn change_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<NoContent> {
    PasswordResetService::new(state.service_context())
        .change_password(request)
        .await?;
    Ok(NoContent)
}
