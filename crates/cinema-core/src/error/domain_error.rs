//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid code format")]
    InvalidCode,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("No account for this email")]
    AccountNotFound,

    #[error("No active reset code for this email")]
    CodeNotFound,

    #[error("Refresh token not found")]
    TokenNotFound,

    // =========================================================================
    // Credential Errors
    // =========================================================================
    #[error("Reset code has expired")]
    CodeExpired,

    #[error("Reset code does not match")]
    CodeMismatch,

    #[error("Reset proof is invalid or already used")]
    InvalidProof,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Invalid token")]
    InvalidToken,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Code delivery failed: {0}")]
    DeliveryFailure(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidCode => "INVALID_CODE",
            Self::WeakPassword(_) => "WEAK_PASSWORD",

            // Not Found
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::TokenNotFound => "TOKEN_NOT_FOUND",

            // Credentials
            Self::CodeExpired => "CODE_EXPIRED",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::InvalidProof => "INVALID_PROOF",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::InvalidToken => "INVALID_TOKEN",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",

            // Infrastructure
            Self::DeliveryFailure(_) => "DELIVERY_FAILURE",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound | Self::CodeNotFound | Self::TokenNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::InvalidCode
                | Self::WeakPassword(_)
        )
    }

    /// Check if the caller presented a bad, stale, or revoked credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::CodeExpired
                | Self::CodeMismatch
                | Self::InvalidProof
                | Self::InvalidCredentials
                | Self::TokenExpired
                | Self::TokenRevoked
                | Self::InvalidToken
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists)
    }

    /// Only delivery failures are worth retrying; storage errors are surfaced as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DeliveryFailure(_))
    }
}
