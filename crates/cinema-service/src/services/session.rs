//! Session service
//!
//! Registration, login, refresh-token rotation, and logout. Each refresh token
//! is bound to one persisted [`Session`] row; the JWT only carries its id.

use chrono::{DateTime, Utc};
use cinema_common::{hash_password, AppError};
use cinema_core::{normalize_email, DomainError, Member, Session, SessionState};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::dto::{
    AuthResponse, LoginRequest, LogoutRequest, MemberResponse, RefreshTokenRequest,
    RegisterRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Identity extracted from a valid access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedMember {
    pub member_id: Uuid,
    pub session_id: Uuid,
}

/// Session service
pub struct SessionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SessionService<'a> {
    /// Create a new SessionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new member and open a first session
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let email = normalize_email(&request.email)?;
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DomainError::ValidationError("name must not be blank".to_string()).into());
        }

        // Validate password strength before proceeding
        self.ctx
            .password_service()
            .policy()
            .validate(&request.password)?;

        if self.ctx.member_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;

        let now = self.ctx.now();
        let member = Member::new(name.to_string(), email, now);
        self.ctx.member_repo().create(&member, &password_hash).await?;

        info!(member_id = %member.id, "Member registered");

        self.open_session(&member, now).await
    }

    /// Login with email and password
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email =
            normalize_email(&request.email).map_err(|_| DomainError::InvalidCredentials)?;

        let member = self
            .ctx
            .member_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: member not found");
                DomainError::InvalidCredentials
            })?;

        let password_hash = self
            .ctx
            .member_repo()
            .get_password_hash(member.id)
            .await?
            .ok_or_else(|| {
                warn!(member_id = %member.id, "Login failed: no password hash");
                DomainError::InvalidCredentials
            })?;

        if let Err(e) = self
            .ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
        {
            warn!(member_id = %member.id, "Login failed: invalid password");
            return Err(e.into());
        }

        info!(member_id = %member.id, "Member logged in");

        let now = self.ctx.now();
        self.open_session(&member, now).await
    }

    /// Persist an active session and sign a token pair bound to it
    async fn open_session(
        &self,
        member: &Member,
        now: DateTime<Utc>,
    ) -> ServiceResult<AuthResponse> {
        let jwt = self.ctx.jwt_service();
        let session = Session::new(member.id, jwt.refresh_token_ttl(), now);
        self.ctx.session_repo().create(&session).await?;

        let pair = jwt.generate_token_pair(member.id, session.id, now)?;

        debug!(member_id = %member.id, session_id = %session.id, "Session opened");

        Ok(AuthResponse::new(pair, MemberResponse::from(member)))
    }

    /// Exchange a refresh token for a new pair, revoking the old session
    ///
    /// # Errors
    /// - `TokenNotFound` if the token is malformed, forged, or names no session
    /// - `TokenExpired` if the token or its session is past expiry
    /// - `TokenRevoked` if the session was logged out or already rotated
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let now = self.ctx.now();

        let claims = match self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token, now)
        {
            Ok(claims) => claims,
            Err(AppError::TokenExpired) => return Err(DomainError::TokenExpired.into()),
            Err(_) => return Err(DomainError::TokenNotFound.into()),
        };
        let member_id = claims
            .member_id()
            .map_err(|_| DomainError::TokenNotFound)?;

        let session = self
            .ctx
            .session_repo()
            .find_by_id(claims.session_id)
            .await?
            .filter(|s| s.member_id == member_id)
            .ok_or(DomainError::TokenNotFound)?;

        match session.state(now) {
            SessionState::Active => {}
            SessionState::Revoked => {
                warn!(session_id = %session.id, "Refresh with revoked session");
                return Err(DomainError::TokenRevoked.into());
            }
            SessionState::Expired => return Err(DomainError::TokenExpired.into()),
        }

        if !self.ctx.session_repo().revoke(session.id, now).await? {
            // A concurrent refresh or logout won
            return Err(DomainError::TokenRevoked.into());
        }

        let member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::AccountNotFound)?;

        info!(member_id = %member_id, rotated = %session.id, "Session refreshed");

        self.open_session(&member, now).await
    }

    /// Revoke the session behind a refresh token
    ///
    /// Succeeds for unknown, malformed, expired, or already revoked tokens.
    #[instrument(skip(self, request))]
    pub async fn logout(&self, request: LogoutRequest) -> ServiceResult<()> {
        let now = self.ctx.now();

        let Ok(claims) = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token, now)
        else {
            debug!("Logout with unusable token ignored");
            return Ok(());
        };

        let revoked = self.ctx.session_repo().revoke(claims.session_id, now).await?;
        info!(session_id = %claims.session_id, revoked, "Member logged out");

        Ok(())
    }

    /// Revoke every session of a member
    #[instrument(skip(self))]
    pub async fn logout_all(&self, member_id: Uuid) -> ServiceResult<u64> {
        let now = self.ctx.now();
        let revoked = self
            .ctx
            .session_repo()
            .revoke_all_for_member(member_id, now)
            .await?;

        info!(member_id = %member_id, revoked, "Member logged out everywhere");
        Ok(revoked)
    }

    /// Validate an access token
    ///
    /// Access tokens are stateless and stay valid until their own expiry.
    pub fn authenticate(&self, access_token: &str) -> ServiceResult<AuthenticatedMember> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_access_token(access_token, self.ctx.now())?;

        Ok(AuthenticatedMember {
            member_id: claims.member_id()?,
            session_id: claims.session_id,
        })
    }

    /// Get the member behind an authenticated request
    #[instrument(skip(self))]
    pub async fn current_member(&self, member_id: Uuid) -> ServiceResult<MemberResponse> {
        let member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::AccountNotFound)?;

        Ok(MemberResponse::from(&member))
    }

    /// Delete sessions that expired before `before`
    #[instrument(skip(self))]
    pub async fn purge_expired(&self, before: DateTime<Utc>) -> ServiceResult<u64> {
        let purged = self.ctx.session_repo().purge_expired(before).await?;
        if purged > 0 {
            debug!(purged, "Purged sessions");
        }
        Ok(purged)
    }
}
