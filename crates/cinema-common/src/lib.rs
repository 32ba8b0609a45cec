//! # cinema-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    codes_match, generate_numeric_code, generate_opaque_token, hash_password,
    is_numeric_code, verify_password, Claims, JwtService,
    PasswordPolicy, PasswordService, TokenPair, TokenType,
};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, DeliveryConfig,
    Environment, JwtConfig, OtpConfig, PasswordConfig, PurgeConfig, RateLimitConfig,
    RedisConfig, ServerConfig,
};
pub use error::{domain_status, AppError};
pub use telemetry::{try_init_tracing_with_config, TracingConfig, TracingError};
