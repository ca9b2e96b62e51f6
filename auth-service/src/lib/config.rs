use std::env;
use std::time::Duration;

use auth::jwt::codec::MIN_SECRET_LENGTH;
use auth::WorkFactor;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::credential::models::LedgerPolicy;

/// Longest token lifetime accepted, one year.
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 366;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub session_cache: SessionCacheConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
    #[serde(default)]
    pub revocation: RevocationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            grpc_port: default_grpc_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
    #[serde(default)]
    pub issuer: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionCacheConfig {
    #[serde(default = "default_session_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for SessionCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl_secs(),
        }
    }
}

/// Argon2id cost parameters
#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl From<&HashingConfig> for WorkFactor {
    fn from(config: &HashingConfig) -> Self {
        WorkFactor {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RevocationConfig {
    #[serde(default)]
    pub on_unavailable: LedgerPolicy,
}

fn default_http_port() -> u16 {
    8080
}

fn default_grpc_port() -> u16 {
    50051
}

fn default_max_connections() -> u32 {
    1000
}

fn default_min_connections() -> u32 {
    100
}

fn default_max_lifetime_secs() -> u64 {
    300
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_redis_pool_size() -> usize {
    16
}

fn default_redis_timeout_ms() -> u64 {
    500
}

fn default_expiration_hours() -> i64 {
    auth::authenticator::DEFAULT_TOKEN_LIFETIME_HOURS
}

fn default_session_ttl_secs() -> u64 {
    300
}

fn default_memory_kib() -> u32 {
    WorkFactor::default().memory_kib
}

fn default_iterations() -> u32 {
    WorkFactor::default().iterations
}

fn default_parallelism() -> u32 {
    WorkFactor::default().parallelism
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: REDIS__URL=redis://... overrides redis.url
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                MIN_SECRET_LENGTH
            )));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }
        if self.jwt.expiration_hours > MAX_EXPIRATION_HOURS {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must not exceed {}",
                MAX_EXPIRATION_HOURS
            )));
        }
        if self.session_cache.ttl_secs == 0 {
            return Err(ConfigError::Message(
                "session_cache.ttl_secs must be positive".to_string(),
            ));
        }
        if self.redis.pool_size == 0 {
            return Err(ConfigError::Message(
                "redis.pool_size must be positive".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Message(
                "database.min_connections exceeds database.max_connections".to_string(),
            ));
        }

        Ok(())
    }

    pub fn session_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.session_cache.ttl_secs)
    }

    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt.expiration_hours)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    const MINIMAL: &str = r#"
        [database]
        url = "postgres://localhost/auth"

        [redis]
        url = "redis://localhost:6379"

        [jwt]
        secret = "0123456789abcdef0123456789abcdef"
    "#;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_are_applied() {
        let config = parse(MINIMAL).unwrap();

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.server.grpc_port, 50051);
        assert_eq!(config.database.max_connections, 1000);
        assert_eq!(config.redis.pool_size, 16);
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.jwt.issuer, None);
        assert_eq!(config.session_cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.revocation.on_unavailable, LedgerPolicy::FailClosed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ledger_policy_is_configurable() {
        let toml = format!("{}\n[revocation]\non_unavailable = \"fail_open\"\n", MINIMAL);
        let config = parse(&toml).unwrap();

        assert_eq!(config.revocation.on_unavailable, LedgerPolicy::FailOpen);
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let mut config = parse(MINIMAL).unwrap();
        config.jwt.secret = "too-short".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cache_ttl_is_rejected() {
        let mut config = parse(MINIMAL).unwrap();
        config.session_cache.ttl_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_lifetime_bounds() {
        let mut config = parse(MINIMAL).unwrap();

        config.jwt.expiration_hours = 0;
        assert!(config.validate().is_err());

        config.jwt.expiration_hours = MAX_EXPIRATION_HOURS;
        assert!(config.validate().is_ok());

        config.jwt.expiration_hours = i64::MAX;
        assert!(config.validate().is_err());
    }
}
