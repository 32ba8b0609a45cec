//! Refresh session database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the sessions table
#[derive(Debug, Clone, FromRow)]
pub struct SessionModel {
    pub id: Uuid,
    pub member_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}
