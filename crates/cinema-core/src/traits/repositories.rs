//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every state transition on a code or session is
//! a single conditional update so that concurrent callers cannot both win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{Member, OtpCode, Session};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Member>>;

    /// Find member by normalized email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new member with its credential hash
    async fn create(&self, member: &Member, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>>;

    /// Replace the password hash. Fails with `AccountNotFound` if the member is gone.
    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> RepoResult<()>;
}

// ============================================================================
// OTP Repository
// ============================================================================

#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Supersede every outstanding code for `otp.email` and insert `otp`, atomically.
    ///
    /// Returns the number of codes superseded.
    async fn issue(&self, otp: &OtpCode) -> RepoResult<u64>;

    /// The outstanding (unconsumed, unsuperseded) code for an email, expired or not
    async fn find_active(&self, email: &str) -> RepoResult<Option<OtpCode>>;

    /// Most recent record for `email` holding exactly `code`, in any state
    async fn find_by_code(&self, email: &str, code: &str) -> RepoResult<Option<OtpCode>>;

    /// Consume-if-active. Returns false when another caller got there first
    /// or the code was superseded in between.
    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<bool>;

    /// Increment the attempt counter of an outstanding code.
    ///
    /// Returns the new count, or `None` if the code is no longer outstanding.
    async fn record_failed_attempt(&self, id: Uuid) -> RepoResult<Option<u32>>;

    /// Delete a code record. Returns false if it was already gone.
    async fn discard(&self, id: Uuid) -> RepoResult<bool>;

    /// Delete codes that expired before `before`, whatever their state.
    /// Superseded codes stay until then so a late submission still reads as stale.
    async fn purge_expired(&self, before: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Session Repository
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a freshly issued session
    async fn create(&self, session: &Session) -> RepoResult<()>;

    /// Find session by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Session>>;

    /// Revoke-if-active. Returns false if already revoked or unknown.
    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<bool>;

    /// Revoke every unrevoked session of a member. Returns how many were revoked.
    async fn revoke_all_for_member(&self, member_id: Uuid, at: DateTime<Utc>) -> RepoResult<u64>;

    /// Delete sessions that expired before `before`
    async fn purge_expired(&self, before: DateTime<Utc>) -> RepoResult<u64>;
}
