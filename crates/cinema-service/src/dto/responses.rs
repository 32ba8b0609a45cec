//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use cinema_common::TokenPair;
use cinema_core::Member;
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Session Responses
// ============================================================================

/// Public view of a member account
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            email: member.email.clone(),
            created_at: member.created_at,
        }
    }
}

/// Token pair plus the member it was issued to
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub member: MemberResponse,
}

impl AuthResponse {
    pub fn new(pair: TokenPair, member: MemberResponse) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
            member,
        }
    }
}

// ============================================================================
// Password Reset Responses
// ============================================================================

/// Answer to a reset request. Identical for known and unknown accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetRequestedResponse {
    pub message: String,
    /// Lifetime of the issued code in seconds
    pub expires_in: i64,
}

impl ResetRequestedResponse {
    pub fn new(expires_in: i64) -> Self {
        Self {
            message: "If the account exists, a reset code has been sent".to_string(),
            expires_in,
        }
    }
}

/// Proof of a verified code, redeemable once for a password change
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpResponse {
    pub proof_token: String,
    pub expires_in: i64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Readiness response with one entry per dependency check
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub checks: BTreeMap<&'static str, &'static str>,
}

impl ReadinessResponse {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
