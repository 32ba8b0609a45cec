//! Credential reset service
//!
//! Issues one-time reset codes, verifies them into single-use proof tokens,
//! and redeems a proof for a new password.
//!
//! Every code transition goes through a conditional repository update, so two
//! requests racing on one email cannot both observe an active code.

use chrono::{DateTime, Utc};
use cinema_common::{codes_match, generate_numeric_code, generate_opaque_token, is_numeric_code};
use cinema_core::{normalize_email, DomainError, OtpCode, ProofGrant};
use tracing::{debug, info, instrument, warn};

use crate::dto::{
    ChangePasswordRequest, PasswordResetRequest, ResetRequestedResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Credential reset service
pub struct PasswordResetService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PasswordResetService<'a> {
    /// Create a new PasswordResetService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue a fresh code for an email and hand it to the delivery channel
    ///
    /// Any outstanding code for the same email is superseded. Unknown accounts
    /// get the same answer as known ones unless the policy says otherwise.
    #[instrument(skip(self, request))]
    pub async fn request_reset(
        &self,
        request: PasswordResetRequest,
    ) -> ServiceResult<ResetRequestedResponse> {
        let email = normalize_email(&request.email)?;
        let policy = self.ctx.reset_policy();

        let Some(member) = self.ctx.member_repo().find_by_email(&email).await? else {
            if policy.reveal_unknown_accounts {
                return Err(DomainError::AccountNotFound.into());
            }
            info!("Reset requested for unknown account");
            return Ok(ResetRequestedResponse::new(policy.code_ttl_secs()));
        };

        let now = self.ctx.now();
        let otp = OtpCode::issue(
            email,
            generate_numeric_code(policy.code_length),
            policy.code_ttl,
            now,
        );

        let superseded = self.ctx.otp_repo().issue(&otp).await?;
        info!(
            member_id = %member.id,
            otp_id = %otp.id,
            superseded,
            "Reset code issued"
        );

        self.deliver(&otp).await?;

        Ok(ResetRequestedResponse::new(policy.code_ttl_secs()))
    }

    /// Send a code through the configured channel, bounded by the delivery timeout
    async fn deliver(&self, otp: &OtpCode) -> ServiceResult<()> {
        let delivery = self.ctx.delivery();
        let timeout = self.ctx.reset_policy().delivery_timeout;

        match tokio::time::timeout(timeout, delivery.send(&otp.email, &otp.code)).await {
            Ok(Ok(())) => {
                debug!(channel = delivery.channel(), otp_id = %otp.id, "Reset code delivered");
                Ok(())
            }
            Ok(Err(DomainError::DeliveryFailure(reason))) => {
                warn!(channel = delivery.channel(), %reason, "Reset code delivery failed");
                Err(DomainError::DeliveryFailure(reason).into())
            }
            Ok(Err(e)) => {
                warn!(channel = delivery.channel(), error = %e, "Reset code delivery failed");
                Err(DomainError::DeliveryFailure(e.to_string()).into())
            }
            Err(_) => {
                warn!(
                    channel = delivery.channel(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Reset code delivery timed out"
                );
                Err(DomainError::DeliveryFailure(format!(
                    "{} delivery timed out after {}ms",
                    delivery.channel(),
                    timeout.as_millis()
                ))
                .into())
            }
        }
    }

    /// Check a submitted code and exchange it for a proof token
    ///
    /// # Errors
    /// - `InvalidCode` if the code is not a numeric string of the configured length
    /// - `CodeNotFound` if no outstanding code matches, including superseded and used ones
    /// - `CodeExpired` if the outstanding code is past its TTL (it is discarded)
    /// - `CodeMismatch` if the value differs (the attempt is counted)
    #[instrument(skip(self, request))]
    pub async fn verify_otp(&self, request: VerifyOtpRequest) -> ServiceResult<VerifyOtpResponse> {
        let email = normalize_email(&request.email)?;
        let policy = self.ctx.reset_policy();
        let code = request.code.trim();

        if !is_numeric_code(code, policy.code_length) {
            return Err(DomainError::InvalidCode.into());
        }

        let now = self.ctx.now();
        let otp_repo = self.ctx.otp_repo();

        let otp = otp_repo
            .find_active(&email)
            .await?
            .ok_or(DomainError::CodeNotFound)?;

        if otp.is_expired(now) {
            otp_repo.discard(otp.id).await?;
            info!(otp_id = %otp.id, "Expired reset code discarded");
            return Err(DomainError::CodeExpired.into());
        }

        if otp.attempts >= policy.max_attempts {
            otp_repo.discard(otp.id).await?;
            return Err(DomainError::CodeNotFound.into());
        }

        if !codes_match(&otp.code, code) {
            return Err(self.reject_mismatch(&otp, &email, code, now).await);
        }

        if !otp_repo.consume(otp.id, now).await? {
            // Lost the race to another verify or a newer request
            return Err(DomainError::CodeNotFound.into());
        }

        let member = self
            .ctx
            .member_repo()
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::AccountNotFound)?;

        let token = generate_opaque_token();
        let grant = ProofGrant::new(member.id, email, now, now + policy.proof_ttl);
        let ttl_secs = u64::try_from(policy.proof_ttl_secs()).unwrap_or(0);
        self.ctx.proof_store().store(&token, &grant, ttl_secs).await?;

        info!(member_id = %member.id, otp_id = %otp.id, "Reset code verified");

        Ok(VerifyOtpResponse {
            proof_token: token,
            expires_in: policy.proof_ttl_secs(),
        })
    }

    /// Classify a wrong value against the outstanding code
    ///
    /// A value belonging to a superseded or used code that is still inside its
    /// TTL is reported as not found. Anything else, older codes included,
    /// counts as a failed attempt.
    async fn reject_mismatch(
        &self,
        active: &OtpCode,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> ServiceError {
        let otp_repo = self.ctx.otp_repo();

        match otp_repo.find_by_code(email, code).await {
            Ok(Some(stale)) if stale.id != active.id && !stale.is_expired(now) => {
                debug!(otp_id = %stale.id, "Stale reset code submitted");
                return DomainError::CodeNotFound.into();
            }
            Ok(_) => {}
            Err(e) => return e.into(),
        }

        let max_attempts = self.ctx.reset_policy().max_attempts;
        match otp_repo.record_failed_attempt(active.id).await {
            Ok(Some(attempts)) if attempts >= max_attempts => {
                warn!(otp_id = %active.id, attempts, "Reset code attempt limit reached");
                if let Err(e) = otp_repo.discard(active.id).await {
                    return e.into();
                }
                DomainError::CodeMismatch.into()
            }
            Ok(Some(attempts)) => {
                info!(
                    otp_id = %active.id,
                    remaining = max_attempts.saturating_sub(attempts),
                    "Reset code mismatch"
                );
                DomainError::CodeMismatch.into()
            }
            // Superseded or consumed while we were comparing
            Ok(None) => DomainError::CodeNotFound.into(),
            Err(e) => e.into(),
        }
    }

    /// Redeem a proof token for a new password
    ///
    /// Strength is checked before the proof is taken, so a weak password leaves
    /// the proof usable. On success every refresh session of the member is revoked.
    ///
    /// # Errors
    /// - `WeakPassword` if the password fails the policy
    /// - `InvalidProof` if the token is unknown, already used, or expired
    #[instrument(skip(self, request))]
    pub async fn change_password(&self, request: ChangePasswordRequest) -> ServiceResult<()> {
        let passwords = self.ctx.password_service();
        passwords.policy().validate(&request.new_password)?;

        if request.proof_token.trim().is_empty() {
            return Err(DomainError::InvalidProof.into());
        }

        let now = self.ctx.now();
        let grant = self
            .ctx
            .proof_store()
            .take(request.proof_token.trim())
            .await?
            .ok_or(DomainError::InvalidProof)?;

        if grant.is_expired(now) {
            return Err(DomainError::InvalidProof.into());
        }

        let password_hash = passwords.hash_new(&request.new_password)?;
        self.ctx
            .member_repo()
            .update_password(grant.member_id, &password_hash, now)
            .await?;

        let revoked = self
            .ctx
            .session_repo()
            .revoke_all_for_member(grant.member_id, now)
            .await?;

        info!(member_id = %grant.member_id, revoked, "Password changed via reset");

        Ok(())
    }

    /// Delete code records whose TTL ended before `before`, whatever their state
    #[instrument(skip(self))]
    pub async fn purge_expired(&self, before: DateTime<Utc>) -> ServiceResult<u64> {
        let purged = self.ctx.otp_repo().purge_expired(before).await?;
        if purged > 0 {
            debug!(purged, "Purged reset codes");
        }
        Ok(purged)
    }
}
