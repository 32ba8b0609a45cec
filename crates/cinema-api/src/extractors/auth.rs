//! Authentication extractor
//!
//! Validates the bearer access token from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use cinema_service::{AuthenticatedMember, SessionService};
use uuid::Uuid;

use crate::response::ApiError;
use crate::state::AppState;

/// Member identified by a valid access token
#[derive(Debug, Clone, Copy)]
pub struct AuthMember {
    pub member_id: Uuid,
    pub session_id: Uuid,
}

impl From<AuthenticatedMember> for AuthMember {
    fn from(member: AuthenticatedMember) -> Self {
        Self {
            member_id: member.member_id,
            session_id: member.session_id,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthMember
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let member = SessionService::new(app_state.service_context())
            .authenticate(bearer.token())
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                ApiError::from(e)
            })?;

        Ok(member.into())
    }
}
