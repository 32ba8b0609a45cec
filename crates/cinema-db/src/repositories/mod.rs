//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in cinema-core.

mod error;
mod health;
mod member;
mod otp_code;
mod session;

pub use health::PgHealthCheck;
pub use member::PgMemberRepository;
pub use otp_code::PgOtpRepository;
pub use session::PgSessionRepository;
