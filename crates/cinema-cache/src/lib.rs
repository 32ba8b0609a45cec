//! # cinema-cache
//!
//! Redis layer for short-lived reset proofs.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Proof Tokens**: Single-use storage redeemed with an atomic `GETDEL`
//! - **Health**: `PING` check for the readiness endpoint
//!
//! ## Example
//!
//! ```ignore
//! use cinema_cache::{RedisPool, RedisPoolConfig, RedisProofTokenStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let proofs = RedisProofTokenStore::new(pool.clone());
//! proofs.store(&token, &grant, 600).await?;
//! let grant = proofs.take(&token).await?; // Some once, then None
//! ```

pub mod health;
pub mod pool;
pub mod proof;

pub use health::RedisHealthCheck;
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use proof::RedisProofTokenStore;
