//! Storage reclamation for expired codes and sessions
//!
//! Correctness never depends on this running; expiry is always checked at lookup.

use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::password_reset::PasswordResetService;
use super::session::SessionService;

/// Rows removed by one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub codes: u64,
    pub sessions: u64,
}

impl PurgeReport {
    pub fn total(&self) -> u64 {
        self.codes + self.sessions
    }
}

pub struct MaintenanceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MaintenanceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Purge everything that expired before the current instant
    #[instrument(skip(self))]
    pub async fn purge_expired(&self) -> ServiceResult<PurgeReport> {
        let now = self.ctx.now();

        let report = PurgeReport {
            codes: PasswordResetService::new(self.ctx).purge_expired(now).await?,
            sessions: SessionService::new(self.ctx).purge_expired(now).await?,
        };

        if report.total() > 0 {
            info!(codes = report.codes, sessions = report.sessions, "Purge complete");
        }

        Ok(report)
    }
}
