//! Server setup and initialization
//!
//! Provides the application builder, the background purge task, and the server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use cinema_cache::{RedisHealthCheck, RedisPool, RedisProofTokenStore};
use cinema_common::{AppConfig, AppError, JwtService, PasswordPolicy, PasswordService};
use cinema_db::{
    create_pool, run_migrations, DatabaseConfig, PgHealthCheck, PgMemberRepository,
    PgOtpRepository, PgSessionRepository,
};
use cinema_service::{
    build_delivery, MaintenanceService, ResetPolicy, ServiceContext, ServiceContextBuilder,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// # Errors
/// Returns `AppError::Config` if the rate limit settings are unusable
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;
    let health = apply_middleware(health_routes());

    Ok(health.merge(api).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create Redis pool
    info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let password_service =
        PasswordService::new(PasswordPolicy::new(config.password.min_length));

    let service_context = ServiceContextBuilder::new()
        .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
        .otp_repo(Arc::new(PgOtpRepository::new(pool.clone())))
        .session_repo(Arc::new(PgSessionRepository::new(pool.clone())))
        .proof_store(Arc::new(RedisProofTokenStore::new(redis_pool.clone())))
        .delivery(build_delivery(&config.delivery))
        .health_check(Arc::new(PgHealthCheck::new(pool)))
        .health_check(Arc::new(RedisHealthCheck::new(redis_pool)))
        .jwt_service(jwt_service)
        .password_service(password_service)
        .reset_policy(ResetPolicy::from(&config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Periodically delete expired codes and sessions
pub fn spawn_purge_task(ctx: Arc<ServiceContext>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = MaintenanceService::new(&ctx).purge_expired().await {
                warn!(error = %e, "Background purge failed");
            }
        }
    })
}

/// Run the HTTP server until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {e}")))?;
    let purge_interval = config.purge.interval();

    let state = create_app_state(config).await?;

    let purge_task = purge_interval.map(|interval| {
        info!(interval_secs = interval.as_secs(), "Background purge enabled");
        spawn_purge_task(state.shared_context(), interval)
    });

    let app = create_app(state)?;
    let result = run_server(app, addr).await;

    if let Some(task) = purge_task {
        task.abort();
    }

    result
}
