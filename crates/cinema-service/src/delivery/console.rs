//! Development delivery: reset codes go to the debug log only.

use async_trait::async_trait;
use cinema_core::{CodeDelivery, RepoResult};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogDelivery;

impl LogDelivery {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CodeDelivery for LogDelivery {
    fn channel(&self) -> &'static str {
        "log"
    }

    async fn send(&self, email: &str, code: &str) -> RepoResult<()> {
        debug!(to = %email, code = %code, "Password reset code (development delivery)");
        Ok(())
    }
}
