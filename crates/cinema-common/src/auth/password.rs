//! Password hashing and strength rules
//!
//! Uses Argon2id for password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use cinema_core::DomainError;

use crate::error::AppError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Minimum requirements for a new password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    #[must_use]
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Check length (in characters) and the upper/lower/digit mix
    ///
    /// # Errors
    /// Returns `DomainError::WeakPassword` naming the first unmet rule
    pub fn validate(&self, password: &str) -> Result<(), DomainError> {
        if password.chars().count() < self.min_length {
            return Err(DomainError::WeakPassword(format!(
                "must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(char::is_uppercase) {
            return Err(DomainError::WeakPassword(
                "must contain at least one uppercase letter".to_string(),
            ));
        }

        if !password.chars().any(char::is_lowercase) {
            return Err(DomainError::WeakPassword(
                "must contain at least one lowercase letter".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(DomainError::WeakPassword(
                "must contain at least one digit".to_string(),
            ));
        }

        Ok(())
    }
}

/// Password service for dependency injection
#[derive(Debug, Clone, Default)]
pub struct PasswordService {
    policy: PasswordPolicy,
}

impl PasswordService {
    #[must_use]
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> PasswordPolicy {
        self.policy
    }

    /// Validate strength, then hash
    ///
    /// # Errors
    /// Returns `WeakPassword` before doing any hashing work
    pub fn hash_new(&self, password: &str) -> Result<String, AppError> {
        self.policy.validate(password)?;
        hash_password(password)
    }

    /// Verify a password and return an error if invalid
    ///
    /// # Errors
    /// Returns `AppError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}
