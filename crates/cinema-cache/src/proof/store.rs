//! Redis-backed [`ProofTokenStore`].
//!
//! Grants live under `proof_token:<token>` with a TTL and are redeemed with
//! `GETDEL`, so two concurrent redemptions of one token cannot both succeed.

use async_trait::async_trait;
use cinema_core::entities::ProofGrant;
use cinema_core::traits::{ProofTokenStore, RepoResult};
use tracing::instrument;

use crate::pool::RedisPool;

/// Key prefix for proof tokens
const PROOF_TOKEN_PREFIX: &str = "proof_token:";

#[derive(Clone)]
pub struct RedisProofTokenStore {
    pool: RedisPool,
}

impl RedisProofTokenStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn key(token: &str) -> String {
        format!("{PROOF_TOKEN_PREFIX}{token}")
    }
}

#[async_trait]
impl ProofTokenStore for RedisProofTokenStore {
    #[instrument(skip(self, token, grant), fields(member_id = %grant.member_id))]
    async fn store(&self, token: &str, grant: &ProofGrant, ttl_secs: u64) -> RepoResult<()> {
        self.pool.set_ex(&Self::key(token), grant, ttl_secs).await?;
        tracing::debug!(ttl_secs, "Stored reset proof");
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn take(&self, token: &str) -> RepoResult<Option<ProofGrant>> {
        let grant: Option<ProofGrant> = self.pool.take(&Self::key(token)).await?;
        if let Some(grant) = &grant {
            tracing::debug!(member_id = %grant.member_id, "Redeemed reset proof");
        }
        Ok(grant)
    }
}
