//! Redis readiness check

use async_trait::async_trait;
use cinema_core::traits::{HealthCheck, RepoResult};

use crate::pool::RedisPool;

#[derive(Clone)]
pub struct RedisHealthCheck {
    pool: RedisPool,
}

impl RedisHealthCheck {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for RedisHealthCheck {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> RepoResult<()> {
        self.pool.health_check().await?;
        Ok(())
    }
}
