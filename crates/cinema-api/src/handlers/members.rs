//! Member handlers

use axum::{extract::State, Json};
use cinema_service::{MemberResponse, SessionService};

use crate::extractors::AuthMember;
use crate::response::ApiResult;
use crate::state::AppState;

/// Get the authenticated member
///
/// GET /members/@me
pub async fn get_current_member(
    State(state): State<AppState>,
    auth: AuthMember,
) -> ApiResult<Json<MemberResponse>> {
    let service = SessionService::new(state.service_context());
    let member = service.current_member(auth.member_id).await?;
    Ok(Json(member))
}
