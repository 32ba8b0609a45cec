//! Integration test utilities for the cinema auth backend
//!
//! In-memory implementations of every storage port, a manual clock, recording
//! delivery channels, and a test server that serves the real Axum app.

pub mod helpers;

pub use clock::ManualClock;
pub use delivery::{FailingDelivery, RecordingDelivery, SlowDelivery};
pub use fixtures::*;
pub use helpers::*;
pub use memory::{
    InMemoryMemberRepository, InMemoryOtpRepository, InMemoryProofTokenStore,
    InMemorySessionRepository,
};
