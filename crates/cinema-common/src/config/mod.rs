//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, DeliveryConfig,
    Environment, JwtConfig, OtpConfig, PasswordConfig, PurgeConfig, RateLimitConfig,
    RedisConfig, ServerConfig,
};
