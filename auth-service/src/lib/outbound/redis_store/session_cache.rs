use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use serde::Deserialize;
use serde::Serialize;

use crate::credential::errors::CacheError;
use crate::credential::models::CachedCredential;
use crate::credential::models::Identity;
use crate::credential::models::Role;
use crate::credential::ports::SessionCache;

const KEY_PREFIX: &str = "session:";

/// Session cache entries stored as JSON strings under `session:{identity}`.
pub struct RedisSessionCache {
    pool: Pool,
}

impl RedisSessionCache {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn key(identity: &Identity) -> String {
    format!("{}{}", KEY_PREFIX, identity.as_str())
}

/// Wire form of a cache entry
#[derive(Debug, Serialize, Deserialize)]
struct CachedCredentialEntry {
    password_hash: String,
    role: String,
}

impl From<&CachedCredential> for CachedCredentialEntry {
    fn from(entry: &CachedCredential) -> Self {
        Self {
            password_hash: entry.password_hash.clone(),
            role: entry.role.as_str().to_string(),
        }
    }
}

impl TryFrom<CachedCredentialEntry> for CachedCredential {
    type Error = CacheError;

    fn try_from(entry: CachedCredentialEntry) -> Result<Self, Self::Error> {
        Ok(CachedCredential {
            password_hash: entry.password_hash,
            role: Role::parse(&entry.role).map_err(|e| CacheError::Corrupt(e.to_string()))?,
        })
    }
}

fn decode(raw: &str) -> Result<CachedCredential, CacheError> {
    serde_json::from_str::<CachedCredentialEntry>(raw)
        .map_err(|e| CacheError::Corrupt(e.to_string()))?
        .try_into()
}

fn encode(entry: &CachedCredential) -> Result<String, CacheError> {
    serde_json::to_string(&CachedCredentialEntry::from(entry))
        .map_err(|e| CacheError::Corrupt(e.to_string()))
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get(&self, identity: &Identity) -> Result<Option<CachedCredential>, CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        let raw: Option<String> = conn
            .get(key(identity))
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        raw.as_deref().map(decode).transpose()
    }

    async fn put(
        &self,
        identity: &Identity,
        entry: &CachedCredential,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let payload = encode(entry)?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        conn.set_ex::<_, _, ()>(key(identity), payload, ttl.as_secs().max(1))
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        tracing::debug!(identity = %identity, ttl_secs = ttl.as_secs(), "Session cache populated");
        Ok(())
    }
}
