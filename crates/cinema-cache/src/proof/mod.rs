//! Reset proof token storage

mod store;

pub use store::RedisProofTokenStore;
