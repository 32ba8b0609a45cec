//! # cinema-db
//!
//! Database layer implementing the repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations whose state transitions are single
//!   conditional statements
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cinema_db::{create_pool, run_migrations, DatabaseConfig, PgOtpRepository};
//!
//! async fn example(config: &cinema_common::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from(&config.database)).await?;
//!     run_migrations(&pool).await?;
//!     let otp_repo = PgOtpRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgHealthCheck, PgMemberRepository, PgOtpRepository, PgSessionRepository,
};
