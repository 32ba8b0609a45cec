//! Proof of a verified reset code
//!
//! Stored behind an opaque, single-use token and redeemed by a password change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofGrant {
    pub member_id: Uuid,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ProofGrant {
    pub fn new(
        member_id: Uuid,
        email: String,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            member_id,
            email,
            issued_at,
            expires_at,
        }
    }

    /// Stores evict by TTL, but a grant read at the edge is still checked here.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
