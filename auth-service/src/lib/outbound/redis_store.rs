use std::time::Duration;

use deadpool_redis::CreatePoolError;
use deadpool_redis::Pool;
use deadpool_redis::PoolConfig;
use deadpool_redis::Runtime;

use crate::config::RedisConfig;

pub mod revocation_ledger;
pub mod session_cache;

pub use revocation_ledger::RedisRevocationLedger;
pub use session_cache::RedisSessionCache;

/// Build the connection pool shared by the session cache and the revocation
/// ledger. Connections are opened lazily on first use.
pub fn create_pool(config: &RedisConfig) -> Result<Pool, CreatePoolError> {
    let timeout = Duration::from_millis(config.timeout_ms);

    let mut redis_config = deadpool_redis::Config::from_url(&config.url);
    let mut pool_config = PoolConfig::new(config.pool_size);
    pool_config.timeouts.wait = Some(timeout);
    pool_config.timeouts.create = Some(timeout);
    pool_config.timeouts.recycle = Some(timeout);
    redis_config.pool = Some(pool_config);

    redis_config.create_pool(Some(Runtime::Tokio1))
}
