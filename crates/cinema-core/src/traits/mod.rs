//! Ports the domain depends on. Infrastructure crates implement them.

mod clock;
mod ports;
mod repositories;

pub use clock::{Clock, SharedClock, SystemClock};
pub use ports::{CodeDelivery, HealthCheck, ProofTokenStore};
pub use repositories::{MemberRepository, OtpRepository, RepoResult, SessionRepository};
