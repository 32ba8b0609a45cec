//! Database models - SQLx-compatible structs for PostgreSQL tables

mod member;
mod otp_code;
mod session;

pub use member::MemberModel;
pub use otp_code::OtpCodeModel;
pub use session::SessionModel;
