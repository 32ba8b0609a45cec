//! Domain entities - core business objects

mod member;
mod otp_code;
mod proof;
mod session;

pub use member::{normalize_email, Member};
pub use otp_code::{OtpCode, OtpStatus};
pub use proof::ProofGrant;
pub use session::{Session, SessionState};
