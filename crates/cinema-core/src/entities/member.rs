//! Member entity - a registered cinema customer account

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::DomainError;

/// Member account. The credential hash is kept by the repository, never on the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new Member with a fresh identifier
    pub fn new(name: String, email: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as changed (password update, rename)
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Trim and lowercase an email, rejecting anything that is not a well-formed address.
///
/// Every lookup keyed by email goes through this so that `A@x.com` and
/// `a@x.com ` address the same account and the same reset code.
pub fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.validate_email() {
        return Err(DomainError::InvalidEmail);
    }
    Ok(email)
}
