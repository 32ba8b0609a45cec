//! # cinema-core
//!
//! Domain layer for member accounts, one-time reset codes, and refresh sessions.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    normalize_email, Member, OtpCode, OtpStatus, ProofGrant, Session, SessionState,
};
pub use error::DomainError;
pub use traits::{
    Clock, CodeDelivery, HealthCheck, MemberRepository, OtpRepository, ProofTokenStore,
    RepoResult, SessionRepository, SharedClock, SystemClock,
};
