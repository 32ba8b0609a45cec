//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError};

/// Email shape check that tolerates surrounding whitespace.
/// Services trim and lowercase before storing or looking up.
fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

// ============================================================================
// Session Requests
// ============================================================================

/// Member registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_email_address", message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 72, message = "Password must be at most 72 characters"))]
    pub password: String,
}

/// Member login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_email_address", message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Logout request. Any token, even a stale one, is accepted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

// ============================================================================
// Password Reset Requests
// ============================================================================

/// Ask for a reset code to be delivered to an email
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(custom(function = "validate_email_address", message = "Invalid email format"))]
    pub email: String,
}

/// Submit a delivered reset code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(custom(function = "validate_email_address", message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 16, message = "Code must be 1-16 characters"))]
    pub code: String,
}

/// Redeem a proof token for a new password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Proof token is required"))]
    pub proof_token: String,

    #[validate(length(max = 72, message = "Password must be at most 72 characters"))]
    pub new_password: String,
}
