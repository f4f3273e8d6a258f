use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_DATABASE_URL: &str = "clinic.db";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24;
pub const DEFAULT_PASSWORD_HASH_MEMORY_KIB: u32 = 19_456;
pub const DEFAULT_PASSWORD_HASH_ITERATIONS: u32 = 2;

pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;
pub const MAX_EMAIL_ATTEMPTS: u32 = 10;
pub const MAX_EMAIL_RETRY_DELAY_MS: u64 = 60_000;
pub const MAX_CLAIM_TIMEOUT_SECONDS: i64 = 60 * 60 * 24;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub password_hash_memory_kib: u32,
    pub password_hash_iterations: u32,
    pub server_host: String,
    pub server_port: u16,
    pub notification_dispatch_interval_seconds: u64,
    pub notification_claim_timeout_seconds: i64,
    pub email_max_attempts: u32,
    pub email_retry_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: String::new(),
            access_token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            password_hash_memory_kib: DEFAULT_PASSWORD_HASH_MEMORY_KIB,
            password_hash_iterations: DEFAULT_PASSWORD_HASH_ITERATIONS,
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            notification_dispatch_interval_seconds: 0,
            notification_claim_timeout_seconds: 300,
            email_max_attempts: 3,
            email_retry_delay_ms: 500,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, using {}", DEFAULT_DATABASE_URL);
                    defaults.database_url.clone()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            access_token_ttl_minutes: clamp_var(
                "ACCESS_TOKEN_TTL_MINUTES",
                parse_var("ACCESS_TOKEN_TTL_MINUTES", defaults.access_token_ttl_minutes),
                1,
                MAX_TOKEN_TTL_MINUTES,
            ),
            password_hash_memory_kib: parse_var("PASSWORD_HASH_MEMORY_KIB", defaults.password_hash_memory_kib),
            password_hash_iterations: parse_var("PASSWORD_HASH_ITERATIONS", defaults.password_hash_iterations),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            notification_dispatch_interval_seconds: parse_var(
                "NOTIFICATION_DISPATCH_INTERVAL_SECONDS",
                defaults.notification_dispatch_interval_seconds,
            ),
            notification_claim_timeout_seconds: clamp_var(
                "NOTIFICATION_CLAIM_TIMEOUT_SECONDS",
                parse_var(
                    "NOTIFICATION_CLAIM_TIMEOUT_SECONDS",
                    defaults.notification_claim_timeout_seconds,
                ),
                0,
                MAX_CLAIM_TIMEOUT_SECONDS,
            ),
            email_max_attempts: clamp_var(
                "EMAIL_MAX_ATTEMPTS",
                parse_var("EMAIL_MAX_ATTEMPTS", defaults.email_max_attempts),
                1,
                MAX_EMAIL_ATTEMPTS,
            ),
            email_retry_delay_ms: clamp_var(
                "EMAIL_RETRY_DELAY_MS",
                parse_var("EMAIL_RETRY_DELAY_MS", defaults.email_retry_delay_ms),
                0,
                MAX_EMAIL_RETRY_DELAY_MS,
            ),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty() && !self.jwt_secret.is_empty()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn is_dispatch_sweeper_enabled(&self) -> bool {
        self.notification_dispatch_interval_seconds > 0
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Pull `value` into `min..=max`, warning when it had to move.
fn clamp_var<T>(name: &str, value: T, min: T, max: T) -> T
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    let clamped = if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    };
    if clamped != value {
        warn!("{} value {} is out of range, using {}", name, value, clamped);
    }
    clamped
}
