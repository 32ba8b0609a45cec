//! Non-repository ports: proof token storage, code delivery, health checks

use async_trait::async_trait;

use crate::entities::ProofGrant;
use crate::traits::RepoResult;

/// Short-lived, single-use storage for reset proofs
#[async_trait]
pub trait ProofTokenStore: Send + Sync {
    /// Store a grant under `token`, evicted after `ttl_secs`
    async fn store(&self, token: &str, grant: &ProofGrant, ttl_secs: u64) -> RepoResult<()>;

    /// Atomically read and delete. A second `take` of the same token yields `None`.
    async fn take(&self, token: &str) -> RepoResult<Option<ProofGrant>>;
}

/// Out-of-band channel carrying a reset code to its owner
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    /// Short channel name used in logs
    fn channel(&self) -> &'static str;

    /// Deliver `code` to `email`. Failures map to `DomainError::DeliveryFailure`.
    async fn send(&self, email: &str, code: &str) -> RepoResult<()>;
}

/// Dependency check used by the readiness endpoint
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self) -> RepoResult<()>;
}
