//! Service context - dependency container for services
//!
//! Holds the repositories, stores, delivery channel, and clock the services need.
//! Everything is behind a trait object so PostgreSQL/Redis and in-memory
//! backends are interchangeable.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use cinema_common::{JwtService, PasswordService};
use cinema_core::traits::{
    CodeDelivery, HealthCheck, MemberRepository, OtpRepository, ProofTokenStore,
    SessionRepository, SharedClock, SystemClock,
};

use super::error::{ServiceError, ServiceResult};
use super::policy::ResetPolicy;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    member_repo: Arc<dyn MemberRepository>,
    otp_repo: Arc<dyn OtpRepository>,
    session_repo: Arc<dyn SessionRepository>,

    // Stores and channels
    proof_store: Arc<dyn ProofTokenStore>,
    delivery: Arc<dyn CodeDelivery>,
    health_checks: Vec<Arc<dyn HealthCheck>>,

    // Services
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    clock: SharedClock,
    reset_policy: ResetPolicy,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    pub fn otp_repo(&self) -> &dyn OtpRepository {
        self.otp_repo.as_ref()
    }

    pub fn session_repo(&self) -> &dyn SessionRepository {
        self.session_repo.as_ref()
    }

    // === Stores and channels ===

    pub fn proof_store(&self) -> &dyn ProofTokenStore {
        self.proof_store.as_ref()
    }

    pub fn delivery(&self) -> &dyn CodeDelivery {
        self.delivery.as_ref()
    }

    pub fn health_checks(&self) -> &[Arc<dyn HealthCheck>] {
        &self.health_checks
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    pub fn reset_policy(&self) -> &ResetPolicy {
        &self.reset_policy
    }

    /// Current time according to the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("delivery", &self.delivery.channel())
            .field("health_checks", &self.health_checks.len())
            .field("reset_policy", &self.reset_policy)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    member_repo: Option<Arc<dyn MemberRepository>>,
    otp_repo: Option<Arc<dyn OtpRepository>>,
    session_repo: Option<Arc<dyn SessionRepository>>,
    proof_store: Option<Arc<dyn ProofTokenStore>>,
    delivery: Option<Arc<dyn CodeDelivery>>,
    health_checks: Vec<Arc<dyn HealthCheck>>,
    jwt_service: Option<Arc<JwtService>>,
    password_service: Option<PasswordService>,
    clock: Option<SharedClock>,
    reset_policy: Option<ResetPolicy>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn otp_repo(mut self, repo: Arc<dyn OtpRepository>) -> Self {
        self.otp_repo = Some(repo);
        self
    }

    pub fn session_repo(mut self, repo: Arc<dyn SessionRepository>) -> Self {
        self.session_repo = Some(repo);
        self
    }

    pub fn proof_store(mut self, store: Arc<dyn ProofTokenStore>) -> Self {
        self.proof_store = Some(store);
        self
    }

    pub fn delivery(mut self, delivery: Arc<dyn CodeDelivery>) -> Self {
        self.delivery = Some(delivery);
        self
    }

    pub fn health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn password_service(mut self, service: PasswordService) -> Self {
        self.password_service = Some(service);
        self
    }

    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = Some(policy);
        self
    }

    /// Build the ServiceContext
    ///
    /// Clock, password rules, and reset policy fall back to defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a repository, store, or the JWT service is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let missing = |name: &str| ServiceError::validation(format!("{name} is required"));

        Ok(ServiceContext {
            member_repo: self.member_repo.ok_or_else(|| missing("member_repo"))?,
            otp_repo: self.otp_repo.ok_or_else(|| missing("otp_repo"))?,
            session_repo: self.session_repo.ok_or_else(|| missing("session_repo"))?,
            proof_store: self.proof_store.ok_or_else(|| missing("proof_store"))?,
            delivery: self.delivery.ok_or_else(|| missing("delivery"))?,
            health_checks: self.health_checks,
            jwt_service: self.jwt_service.ok_or_else(|| missing("jwt_service"))?,
            password_service: self.password_service.unwrap_or_default(),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            reset_policy: self.reset_policy.unwrap_or_default(),
        })
    }
}
