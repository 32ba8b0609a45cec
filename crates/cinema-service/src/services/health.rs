//! Health service
//!
//! Liveness is unconditional. Readiness runs every registered dependency check,
//! each bounded by a timeout.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::warn;

use crate::dto::{HealthResponse, ReadinessResponse};

use super::context::ServiceContext;

const CHECK_TIMEOUT: Duration = Duration::from_secs(2);

pub struct HealthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HealthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn liveness(&self) -> HealthResponse {
        HealthResponse::ok()
    }

    /// Check every dependency. Ready only if all of them answer in time.
    pub async fn readiness(&self) -> ReadinessResponse {
        let mut checks = BTreeMap::new();
        let mut ready = true;

        for check in self.ctx.health_checks() {
            let healthy = match tokio::time::timeout(CHECK_TIMEOUT, check.check()).await {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    warn!(check = check.name(), error = %e, "Health check failed");
                    false
                }
                Err(_) => {
                    warn!(check = check.name(), "Health check timed out");
                    false
                }
            };

            ready &= healthy;
            checks.insert(check.name(), if healthy { "ok" } else { "error" });
        }

        ReadinessResponse {
            status: if ready { "ready" } else { "not_ready" },
            timestamp: self.ctx.now(),
            checks,
        }
    }
}
