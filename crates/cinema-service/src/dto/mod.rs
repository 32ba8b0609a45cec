//! Data transfer objects for API requests and responses
//!
//! Request DTOs carry `validator` rules for shape checks. Domain rules such as
//! password strength are enforced again in the services.

pub mod requests;
pub mod responses;

pub use requests::{
    ChangePasswordRequest, LoginRequest, LogoutRequest, PasswordResetRequest,
    RefreshTokenRequest, RegisterRequest, VerifyOtpRequest,
};

pub use responses::{
    AuthResponse, HealthResponse, MemberResponse, ReadinessResponse, ResetRequestedResponse,
    VerifyOtpResponse,
};
