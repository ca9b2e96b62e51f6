use std::time::Duration;

use async_trait::async_trait;

use crate::credential::errors::AuthError;
use crate::credential::errors::CacheError;
use crate::credential::errors::LedgerError;
use crate::credential::models::CachedCredential;
use crate::credential::models::CredentialRecord;
use crate::credential::models::Identity;
use crate::credential::models::IssuedToken;
use crate::credential::models::LoginCommand;
use crate::credential::models::RegisterCommand;
use crate::credential::models::VerifiedIdentity;

/// Port for authentication operations exposed to inbound adapters.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Returns
    /// The persisted credential record
    ///
    /// # Errors
    /// * `AlreadyExists` - Identity is already registered
    /// * `HashingFailure` - Password could not be hashed
    /// * `StoreUnavailable` - Credential store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<CredentialRecord, AuthError>;

    /// Check a password and mint a session token.
    ///
    /// # Errors
    /// * `NotFound` - No account for the identity
    /// * `InvalidCredentials` - Password does not match
    /// * `StoreUnavailable` - Credential store operation failed
    /// * `TokenIssuance` - Token could not be signed
    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, AuthError>;

    /// Revoke a token for the rest of its lifetime.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token is not one this service issued
    /// * `LogoutFailure` - Revocation could not be recorded
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Verify signature, expiry and revocation status of a token.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token is malformed, forged, expired or revoked
    /// * `LedgerUnavailable` - Token is otherwise valid but the ledger could not be read
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Durable store of credential records. Source of truth.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Persist a new record atomically.
    ///
    /// Concurrent creates for one identity yield exactly one success.
    ///
    /// # Errors
    /// * `AlreadyExists` - Identity is already registered
    /// * `StoreUnavailable` - Database operation failed
    async fn create(&self, record: CredentialRecord) -> Result<CredentialRecord, AuthError>;

    /// Retrieve a record by identity.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Database operation failed
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<CredentialRecord>, AuthError>;
}

/// Best-effort read-through cache of credentials keyed by identity.
///
/// Callers treat every error as a miss.
#[async_trait]
pub trait SessionCache: Send + Sync + 'static {
    async fn get(&self, identity: &Identity) -> Result<Option<CachedCredential>, CacheError>;

    async fn put(
        &self,
        identity: &Identity,
        entry: &CachedCredential,
        ttl: Duration,
    ) -> Result<(), CacheError>;
}

/// Record of tokens that must be rejected before their natural expiry.
#[async_trait]
pub trait RevocationLedger: Send + Sync + 'static {
    /// Record `token` as revoked for `ttl`. Idempotent.
    async fn revoke(&self, token: &str, ttl: Duration) -> Result<(), LedgerError>;

    /// Whether `token` has been revoked.
    ///
    /// An unreachable ledger is an error, never `Ok(false)`.
    async fn is_revoked(&self, token: &str) -> Result<bool, LedgerError>;
}
