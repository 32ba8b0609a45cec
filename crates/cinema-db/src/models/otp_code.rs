//! Reset code database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the otp_codes table
#[derive(Debug, Clone, FromRow)]
pub struct OtpCodeModel {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub attempts: i32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub superseded_at: Option<DateTime<Utc>>,
}

impl OtpCodeModel {
    /// Neither consumed nor superseded. Expiry is not considered here.
    #[inline]
    pub fn is_outstanding(&self) -> bool {
        self.consumed_at.is_none() && self.superseded_at.is_none()
    }
}
