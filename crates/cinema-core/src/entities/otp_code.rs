//! One-time reset code entity
//!
//! A code moves `Active -> {Consumed | Expired | Superseded}` and never leaves a
//! terminal state. Expiry is evaluated lazily against the caller's clock.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Lifecycle state of an [`OtpCode`] at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpStatus {
    Active,
    Consumed,
    Expired,
    Superseded,
}

/// Reset code issued for an email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub attempts: u32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub superseded_at: Option<DateTime<Utc>>,
}

impl OtpCode {
    /// Issue a fresh code valid for `ttl` from `now`
    pub fn issue(email: String, code: String, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            code,
            attempts: 0,
            expires_at: now + ttl,
            created_at: now,
            consumed_at: None,
            superseded_at: None,
        }
    }

    /// Current lifecycle state. Consumption and supersession win over expiry.
    pub fn status(&self, now: DateTime<Utc>) -> OtpStatus {
        if self.consumed_at.is_some() {
            OtpStatus::Consumed
        } else if self.superseded_at.is_some() {
            OtpStatus::Superseded
        } else if self.is_expired(now) {
            OtpStatus::Expired
        } else {
            OtpStatus::Active
        }
    }

    /// Check if the TTL has elapsed
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Check if the code can still be verified
    #[inline]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == OtpStatus::Active
    }
}
