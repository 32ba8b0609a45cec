//! PostgreSQL implementation of OtpRepository
//!
//! Issue runs supersede-then-insert in one transaction under a per-email
//! advisory lock. The partial unique index `otp_codes_outstanding_email`
//! backs the one-outstanding-code rule even if the lock were bypassed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use cinema_core::entities::OtpCode;
use cinema_core::error::DomainError;
use cinema_core::traits::{OtpRepository, RepoResult};

use crate::models::OtpCodeModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of OtpRepository
#[derive(Clone)]
pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpRepository for PgOtpRepository {
    #[instrument(skip(self, otp), fields(otp_id = %otp.id, email = %otp.email))]
    async fn issue(&self, otp: &OtpCode) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&otp.email)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let superseded = sqlx::query(
            r"
            UPDATE otp_codes
            SET superseded_at = $2
            WHERE email = $1 AND consumed_at IS NULL AND superseded_at IS NULL
            ",
        )
        .bind(&otp.email)
        .bind(otp.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        sqlx::query(
            r"
            INSERT INTO otp_codes (id, email, code, attempts, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(otp.id)
        .bind(&otp.email)
        .bind(&otp.code)
        .bind(otp.attempts as i32)
        .bind(otp.expires_at)
        .bind(otp.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::Storage("concurrent reset code issue".to_string())
            })
        })?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(superseded)
    }

    #[instrument(skip(self))]
    async fn find_active(&self, email: &str) -> RepoResult<Option<OtpCode>> {
        let result = sqlx::query_as::<_, OtpCodeModel>(
            r"
            SELECT id, email, code, attempts, expires_at, created_at, consumed_at, superseded_at
            FROM otp_codes
            WHERE email = $1 AND consumed_at IS NULL AND superseded_at IS NULL
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(OtpCode::from))
    }

    #[instrument(skip(self, code))]
    async fn find_by_code(&self, email: &str, code: &str) -> RepoResult<Option<OtpCode>> {
        let result = sqlx::query_as::<_, OtpCodeModel>(
            r"
            SELECT id, email, code, attempts, expires_at, created_at, consumed_at, superseded_at
            FROM otp_codes
            WHERE email = $1 AND code = $2
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(email)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(OtpCode::from))
    }

    #[instrument(skip(self))]
    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE otp_codes
            SET consumed_at = $2
            WHERE id = $1
              AND consumed_at IS NULL
              AND superseded_at IS NULL
              AND expires_at > $2
            ",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn record_failed_attempt(&self, id: Uuid) -> RepoResult<Option<u32>> {
        let attempts = sqlx::query_scalar::<_, i32>(
            r"
            UPDATE otp_codes
            SET attempts = attempts + 1
            WHERE id = $1 AND consumed_at IS NULL AND superseded_at IS NULL
            RETURNING attempts
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(attempts.map(|n| u32::try_from(n).unwrap_or(0)))
    }

    #[instrument(skip(self))]
    async fn discard(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM otp_codes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self, before: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            DELETE FROM otp_codes
            WHERE expires_at < $1
            ",
        )
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
