//! Tunables for the credential reset flow

use std::time::Duration as StdDuration;

use chrono::Duration;
use cinema_common::AppConfig;

/// Reset code and proof token settings resolved from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPolicy {
    pub code_length: usize,
    pub code_ttl: Duration,
    pub max_attempts: u32,
    pub proof_ttl: Duration,
    pub delivery_timeout: StdDuration,
    /// Surface `AccountNotFound` instead of answering uniformly
    pub reveal_unknown_accounts: bool,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self {
            code_length: 6,
            code_ttl: Duration::seconds(300),
            max_attempts: 5,
            proof_ttl: Duration::seconds(600),
            delivery_timeout: StdDuration::from_secs(5),
            reveal_unknown_accounts: false,
        }
    }
}

impl From<&AppConfig> for ResetPolicy {
    fn from(config: &AppConfig) -> Self {
        Self {
            code_length: config.otp.length,
            code_ttl: Duration::seconds(config.otp.ttl_seconds),
            max_attempts: config.otp.max_attempts,
            proof_ttl: Duration::seconds(config.otp.proof_ttl_seconds),
            delivery_timeout: config.delivery.timeout(),
            reveal_unknown_accounts: config.otp.reveal_unknown_accounts,
        }
    }
}

impl ResetPolicy {
    pub fn code_ttl_secs(&self) -> i64 {
        self.code_ttl.num_seconds()
    }

    pub fn proof_ttl_secs(&self) -> i64 {
        self.proof_ttl.num_seconds()
    }
}
