//! Test helpers for integration tests
//!
//! [`TestHarness`] wires a [`ServiceContext`] to in-memory backends and a manual
//! clock. [`TestServer`] serves the real Axum app on top of a harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use cinema_api::{create_app, AppState};
use cinema_common::{
    AppConfig, AppSettings, CorsConfig, DatabaseConfig, DeliveryConfig, Environment, JwtConfig,
    OtpConfig, PasswordConfig, PurgeConfig, RateLimitConfig, RedisConfig, ServerConfig,
    JwtService, PasswordPolicy, PasswordService,
};
use cinema_core::CodeDelivery;
use cinema_service::{ResetPolicy, ServiceContext, ServiceContextBuilder};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::clock::ManualClock;
use crate::delivery::RecordingDelivery;
use crate::memory::{
    InMemoryMemberRepository, InMemoryOtpRepository, InMemoryProofTokenStore,
    InMemorySessionRepository,
};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const ACCESS_TTL_SECS: i64 = 900;
pub const REFRESH_TTL_SECS: i64 = 604_800;

/// Service context plus handles on everything behind it
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub clock: Arc<ManualClock>,
    pub delivery: Arc<RecordingDelivery>,
    pub members: Arc<InMemoryMemberRepository>,
    pub otps: Arc<InMemoryOtpRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub proofs: Arc<InMemoryProofTokenStore>,
}

impl TestHarness {
    /// Default policy, recording delivery
    pub fn new() -> Self {
        Self::with_policy(ResetPolicy::default())
    }

    pub fn with_policy(policy: ResetPolicy) -> Self {
        let delivery = Arc::new(RecordingDelivery::new());
        Self::build(
            policy,
            PasswordPolicy::default(),
            Arc::clone(&delivery) as Arc<dyn CodeDelivery>,
            delivery,
        )
    }

    /// Default reset policy with a different password minimum
    pub fn with_password_policy(passwords: PasswordPolicy) -> Self {
        let delivery = Arc::new(RecordingDelivery::new());
        Self::build(
            ResetPolicy::default(),
            passwords,
            Arc::clone(&delivery) as Arc<dyn CodeDelivery>,
            delivery,
        )
    }

    /// Use a custom delivery channel. The recording handle stays empty.
    pub fn with_delivery(policy: ResetPolicy, channel: Arc<dyn CodeDelivery>) -> Self {
        Self::build(
            policy,
            PasswordPolicy::default(),
            channel,
            Arc::new(RecordingDelivery::new()),
        )
    }

    fn build(
        policy: ResetPolicy,
        passwords: PasswordPolicy,
        channel: Arc<dyn CodeDelivery>,
        delivery: Arc<RecordingDelivery>,
    ) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let members = Arc::new(InMemoryMemberRepository::new());
        let otps = Arc::new(InMemoryOtpRepository::new());
        let sessions = Arc::new(InMemorySessionRepository::new());
        let proofs = Arc::new(InMemoryProofTokenStore::new());

        let ctx = ServiceContextBuilder::new()
            .member_repo(members.clone())
            .otp_repo(otps.clone())
            .session_repo(sessions.clone())
            .proof_store(proofs.clone())
            .delivery(channel)
            .jwt_service(Arc::new(JwtService::new(
                TEST_JWT_SECRET,
                ACCESS_TTL_SECS,
                REFRESH_TTL_SECS,
            )))
            .clock(clock.clone())
            .reset_policy(policy)
            .password_service(PasswordService::new(passwords))
            .build()
            .expect("test context is complete");

        Self {
            ctx,
            clock,
            delivery,
            members,
            otps,
            sessions,
            proofs,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for an app served in tests. Nothing here is dialed.
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "cinema-test".to_string(),
            env: Environment::Development,
        },
        api: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
        },
        redis: RedisConfig {
            url: "redis://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry: ACCESS_TTL_SECS,
            refresh_token_expiry: REFRESH_TTL_SECS,
        },
        otp: OtpConfig::default(),
        password: PasswordConfig::default(),
        delivery: DeliveryConfig::default(),
        purge: PurgeConfig {
            interval_seconds: 0,
        },
        rate_limit: RateLimitConfig {
            requests_per_second: 1000,
            burst: 10_000,
        },
        cors: CorsConfig {
            allowed_origins: Vec::new(),
        },
    }
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve the app over the harness's context on an ephemeral port
    pub async fn start(harness: &TestHarness) -> Result<Self> {
        Self::start_with_config(harness, test_config()).await
    }

    pub async fn start_with_config(harness: &TestHarness, config: AppConfig) -> Result<Self> {
        let state = AppState::new(harness.ctx.clone(), config);
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with auth token and no body
    pub async fn post_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).bearer_auth(token).send().await?)
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| anyhow::anyhow!("missing error.code in {body}"))
}
