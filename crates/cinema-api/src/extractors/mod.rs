//! Axum extractors for request handling
//!
//! Custom extractors for bearer authentication and validated JSON bodies.

mod auth;
mod validated;

pub use auth::AuthMember;
pub use validated::ValidatedJson;
