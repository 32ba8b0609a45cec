//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub otp: OtpConfig,
    pub password: PasswordConfig,
    pub delivery: DeliveryConfig,
    pub purge: PurgeConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// HTTP server bind configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration. Expiries are in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

/// Reset code and proof token settings
#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    #[serde(default = "default_otp_length")]
    pub length: usize,
    #[serde(default = "default_otp_ttl")]
    pub ttl_seconds: i64,
    #[serde(default = "default_otp_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_proof_ttl")]
    pub proof_ttl_seconds: i64,
    /// Answer `AccountNotFound` for unknown emails instead of a uniform 202
    #[serde(default)]
    pub reveal_unknown_accounts: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            length: default_otp_length(),
            ttl_seconds: default_otp_ttl(),
            max_attempts: default_otp_max_attempts(),
            proof_ttl_seconds: default_proof_ttl(),
            reveal_unknown_accounts: false,
        }
    }
}

/// Password rules
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    #[serde(default = "default_password_min_length")]
    pub min_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: default_password_min_length(),
        }
    }
}

/// Reset code delivery. Without a webhook URL codes are written to the log.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_delivery_timeout_ms")]
    pub timeout_ms: u64,
}

impl DeliveryConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_ms: default_delivery_timeout_ms(),
        }
    }
}

/// Background sweep of expired codes and sessions
#[derive(Debug, Clone, Deserialize)]
pub struct PurgeConfig {
    /// Zero disables the sweep
    #[serde(default = "default_purge_interval")]
    pub interval_seconds: u64,
}

impl PurgeConfig {
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_seconds > 0).then(|| Duration::from_secs(self.interval_seconds))
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "cinema-auth".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    604_800 // 7 days
}

fn default_otp_length() -> usize {
    6
}

fn default_otp_ttl() -> i64 {
    300
}

fn default_otp_max_attempts() -> u32 {
    5
}

fn default_proof_ttl() -> i64 {
    600
}

fn default_password_min_length() -> usize {
    8
}

fn default_delivery_timeout_ms() -> u64 {
    5_000
}

fn default_purge_interval() -> u64 {
    3_600
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Read an optional variable, parsing it when present
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or unparsable
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: parse_var("APP_ENV")?.unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT")?.ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: required_var("DATABASE_URL")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            redis: RedisConfig {
                url: required_var("REDIS_URL")?,
                max_connections: parse_var("REDIS_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_redis_max_connections),
            },
            jwt: JwtConfig {
                secret: required_var("JWT_SECRET")?,
                access_token_expiry: parse_var("JWT_ACCESS_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_access_token_expiry),
                refresh_token_expiry: parse_var("JWT_REFRESH_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_refresh_token_expiry),
            },
            otp: OtpConfig {
                length: parse_var("OTP_LENGTH")?.unwrap_or_else(default_otp_length),
                ttl_seconds: parse_var("OTP_TTL_SECONDS")?.unwrap_or_else(default_otp_ttl),
                max_attempts: parse_var("OTP_MAX_ATTEMPTS")?
                    .unwrap_or_else(default_otp_max_attempts),
                proof_ttl_seconds: parse_var("PROOF_TOKEN_TTL_SECONDS")?
                    .unwrap_or_else(default_proof_ttl),
                reveal_unknown_accounts: parse_var("RESET_REVEAL_UNKNOWN_ACCOUNTS")?
                    .unwrap_or(false),
            },
            password: PasswordConfig {
                min_length: parse_var("PASSWORD_MIN_LENGTH")?
                    .unwrap_or_else(default_password_min_length),
            },
            delivery: DeliveryConfig {
                webhook_url: env::var("DELIVERY_WEBHOOK_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                timeout_ms: parse_var("DELIVERY_TIMEOUT_MS")?
                    .unwrap_or_else(default_delivery_timeout_ms),
            },
            purge: PurgeConfig {
                interval_seconds: parse_var("PURGE_INTERVAL_SECONDS")?
                    .unwrap_or_else(default_purge_interval),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var("RATE_LIMIT_REQUESTS_PER_SECOND")?
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var("RATE_LIMIT_BURST")?.unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that would make the reset flow unusable
    ///
    /// # Errors
    /// Returns `InvalidValue` naming the offending variable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=10).contains(&self.otp.length) {
            return Err(ConfigError::InvalidValue(
                "OTP_LENGTH",
                self.otp.length.to_string(),
            ));
        }
        if self.otp.ttl_seconds <= 0 {
            return Err(ConfigError::InvalidValue(
                "OTP_TTL_SECONDS",
                self.otp.ttl_seconds.to_string(),
            ));
        }
        if self.otp.max_attempts == 0 {
            return Err(ConfigError::InvalidValue("OTP_MAX_ATTEMPTS", "0".to_string()));
        }
        if self.otp.proof_ttl_seconds <= 0 {
            return Err(ConfigError::InvalidValue(
                "PROOF_TOKEN_TTL_SECONDS",
                self.otp.proof_ttl_seconds.to_string(),
            ));
        }
        if self.jwt.secret.len() < 32 && self.app.env.is_production() {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                "must be at least 32 bytes in production".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
