use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;

use crate::credential::errors::LedgerError;
use crate::credential::ports::RevocationLedger;

const KEY_PREFIX: &str = "revoked:";
const MARKER: &str = "revoked";

/// Revoked tokens stored as `revoked:{token}` keys that expire with the token.
pub struct RedisRevocationLedger {
    pool: Pool,
}

impl RedisRevocationLedger {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn key(token: &str) -> String {
    format!("{}{}", KEY_PREFIX, token)
}

#[async_trait]
impl RevocationLedger for RedisRevocationLedger {
    async fn revoke(&self, token: &str, ttl: Duration) -> Result<(), LedgerError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        // NX keeps the first expiry when a token is revoked twice.
        let created: Option<String> = redis::cmd("SET")
            .arg(key(token))
            .arg(MARKER)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        if created.is_none() {
            tracing::debug!("Token already revoked");
        }

        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, LedgerError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        conn.exists::<_, bool>(key(token))
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_namespaced() {
        assert_eq!(key("abc.def.ghi"), "revoked:abc.def.ghi");
    }
}
