//! Business logic services
//!
//! Services borrow a [`ServiceContext`] for the duration of one request and
//! reach storage only through the traits it holds.

pub mod context;
pub mod error;
pub mod health;
pub mod maintenance;
pub mod password_reset;
pub mod policy;
pub mod session;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use health::HealthService;
pub use maintenance::{MaintenanceService, PurgeReport};
pub use password_reset::PasswordResetService;
pub use policy::ResetPolicy;
pub use session::{AuthenticatedMember, SessionService};
