//! # cinema-service
//!
//! Application layer: credential reset, session management, delivery channels, and DTOs.

pub mod delivery;
pub mod dto;
pub mod services;

pub use delivery::{build_delivery, LogDelivery, WebhookDelivery};
pub use dto::{
    AuthResponse, ChangePasswordRequest, HealthResponse, LoginRequest, LogoutRequest,
    MemberResponse, PasswordResetRequest, ReadinessResponse, RefreshTokenRequest,
    RegisterRequest, ResetRequestedResponse, VerifyOtpRequest, VerifyOtpResponse,
};
pub use services::{
    AuthenticatedMember, HealthService, MaintenanceService, PasswordResetService, PurgeReport,
    ResetPolicy, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    SessionService,
};
