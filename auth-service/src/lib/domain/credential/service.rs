use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;
use auth::JwtError;
use chrono::DateTime;
use chrono::Utc;

use crate::credential::errors::AuthError;
use crate::credential::models::CachedCredential;
use crate::credential::models::CredentialId;
use crate::credential::models::CredentialRecord;
use crate::credential::models::Identity;
use crate::credential::models::IssuedToken;
use crate::credential::models::LoginCommand;
use crate::credential::models::Password;
use crate::credential::models::RegisterCommand;
use crate::credential::models::Role;
use crate::credential::models::VerifiedIdentity;
use crate::credential::ports::AuthServicePort;
use crate::credential::ports::CredentialRepository;
use crate::credential::ports::RevocationLedger;
use crate::credential::ports::SessionCache;

/// Extra time a revocation entry outlives the token it covers.
const REVOCATION_MARGIN_SECS: u64 = 1;

/// Domain service implementation for register, login, logout and verify.
///
/// The credential store is authoritative. The session cache only saves a
/// store read on login and any cache failure degrades to a miss. The
/// revocation ledger gates verification and its failures are surfaced.
pub struct AuthService<CR, SC, RL>
where
    CR: CredentialRepository,
    SC: SessionCache,
    RL: RevocationLedger,
{
    repository: Arc<CR>,
    session_cache: Arc<SC>,
    ledger: Arc<RL>,
    authenticator: Arc<Authenticator>,
    cache_ttl: Duration,
}

impl<CR, SC, RL> AuthService<CR, SC, RL>
where
    CR: CredentialRepository,
    SC: SessionCache,
    RL: RevocationLedger,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store
    /// * `session_cache` - Login accelerator
    /// * `ledger` - Revocation ledger
    /// * `authenticator` - Password hasher and token codec
    /// * `cache_ttl` - Lifetime of session cache entries
    pub fn new(
        repository: Arc<CR>,
        session_cache: Arc<SC>,
        ledger: Arc<RL>,
        authenticator: Arc<Authenticator>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            session_cache,
            ledger,
            authenticator,
            cache_ttl,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.as_str()))
            .await
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?
            .map_err(|e| AuthError::HashingFailure(e.to_string()))
    }

    /// Verify `password` against `stored_hash` and mint a token on success.
    async fn authenticate(
        &self,
        identity: &Identity,
        password: Password,
        stored_hash: String,
        role: Role,
    ) -> Result<IssuedToken, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let subject = identity.as_str().to_string();

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.as_str(), &stored_hash, &subject, role.as_str())
        })
        .await
        .map_err(|e| AuthError::HashingFailure(e.to_string()))?;

        match result {
            Ok(authenticated) => {
                let expires_at = authenticated.claims.expires_at().ok_or_else(|| {
                    AuthError::TokenIssuance("expiry out of range".to_string())
                })?;

                Ok(IssuedToken {
                    token: authenticated.access_token,
                    identity: identity.clone(),
                    role,
                    expires_at,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(identity = %identity, "Login rejected: password mismatch");
                Err(AuthError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(identity = %identity, error = %e, "Stored password hash unusable");
                Err(AuthError::HashingFailure(e.to_string()))
            }
            Err(AuthenticationError::JwtError(e)) => Err(AuthError::TokenIssuance(e.to_string())),
        }
    }

    /// Burn one password check for an identity the store does not know.
    async fn reject_unknown(&self, password: Password) {
        let authenticator = Arc::clone(&self.authenticator);

        if let Err(e) =
            tokio::task::spawn_blocking(move || authenticator.reject_unknown(password.as_str()))
                .await
        {
            tracing::warn!(error = %e, "Placeholder password check did not run");
        }
    }

    async fn cached_credential(&self, identity: &Identity) -> Option<CachedCredential> {
        match self.session_cache.get(identity).await {
            Ok(Some(entry)) => {
                tracing::debug!(identity = %identity, "Session cache hit");
                Some(entry)
            }
            Ok(None) => {
                tracing::debug!(identity = %identity, "Session cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(identity = %identity, error = %e, "Session cache read failed, treating as miss");
                None
            }
        }
    }

    async fn populate_cache(&self, identity: &Identity, entry: &CachedCredential) {
        if let Err(e) = self
            .session_cache
            .put(identity, entry, self.cache_ttl)
            .await
        {
            tracing::warn!(identity = %identity, error = %e, "Session cache write failed");
        }
    }

    /// Reject a freshly minted token that the ledger already knows.
    ///
    /// Token strings carry a random `jti`, so a hit here means something is
    /// badly wrong. A ledger outage does not block login.
    async fn ensure_not_revoked(&self, issued: &IssuedToken) -> Result<(), AuthError> {
        match self.ledger.is_revoked(&issued.token).await {
            Ok(false) => Ok(()),
            Ok(true) => {
                tracing::error!(identity = %issued.identity, "Freshly issued token is already revoked");
                Err(AuthError::Unauthenticated(
                    "token is invalid or expired".to_string(),
                ))
            }
            Err(e) => {
                tracing::warn!(identity = %issued.identity, error = %e, "Skipping revocation check on new token");
                Ok(())
            }
        }
    }

    fn verified_identity(claims: &Claims) -> Result<VerifiedIdentity, AuthError> {
        let malformed = |what: &str| AuthError::Unauthenticated(format!("token carries {}", what));

        Ok(VerifiedIdentity {
            identity: Identity::new(&claims.sub).map_err(|_| malformed("an invalid subject"))?,
            role: Role::parse(&claims.role).map_err(|_| malformed("an unknown role"))?,
            expires_at: claims
                .expires_at()
                .ok_or_else(|| malformed("an invalid expiry"))?,
        })
    }
}

/// Time a revocation entry must live to cover the rest of the token's life.
fn revocation_ttl(claims: &Claims, now: DateTime<Utc>) -> Duration {
    let remaining = claims.remaining_lifetime(now).num_seconds().max(0) as u64;
    Duration::from_secs(remaining + REVOCATION_MARGIN_SECS)
}

#[async_trait]
impl<CR, SC, RL> AuthServicePort for AuthService<CR, SC, RL>
where
    CR: CredentialRepository,
    SC: SessionCache,
    RL: RevocationLedger,
{
    async fn register(&self, command: RegisterCommand) -> Result<CredentialRecord, AuthError> {
        let RegisterCommand {
            identity,
            display_name,
            password,
            role,
        } = command;

        let password_hash = self.hash_password(password).await.map_err(|e| {
            tracing::error!(identity = %identity, error = %e, "Password hashing failed");
            e
        })?;

        let now = Utc::now();
        let record = CredentialRecord {
            id: CredentialId::new(),
            identity,
            display_name,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        };

        match self.repository.create(record).await {
            Ok(created) => {
                tracing::info!(
                    identity = %created.identity,
                    credential_id = %created.id,
                    role = %created.role,
                    "Credential registered"
                );
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                Err(e)
            }
        }
    }

    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, AuthError> {
        let LoginCommand { identity, password } = command;

        // A cached hash is authoritative for the cache TTL: a mismatch here
        // is final and does not fall through to the store. An unusable
        // cached hash counts as a miss.
        if let Some(cached) = self.cached_credential(&identity).await {
            match self
                .authenticate(&identity, password.clone(), cached.password_hash, cached.role)
                .await
            {
                Ok(issued) => {
                    tracing::info!(identity = %identity, source = "cache", "Login succeeded");
                    return Ok(issued);
                }
                Err(AuthError::HashingFailure(e)) => {
                    tracing::warn!(identity = %identity, error = %e, "Cached password hash unusable, reading store");
                }
                Err(e) => return Err(e),
            }
        }

        let Some(record) = self.repository.find_by_identity(&identity).await? else {
            self.reject_unknown(password).await;
            tracing::warn!(identity = %identity, "Login rejected: unknown identity");
            return Err(AuthError::NotFound(identity.to_string()));
        };

        let issued = self
            .authenticate(&identity, password, record.password_hash.clone(), record.role)
            .await?;

        self.populate_cache(&identity, &CachedCredential::from(&record))
            .await;
        self.ensure_not_revoked(&issued).await?;

        tracing::info!(identity = %identity, source = "store", "Login succeeded");
        Ok(issued)
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = match self.authenticator.validate_token(token) {
            Ok(claims) => claims,
            Err(JwtError::TokenExpired) => {
                tracing::info!("Logout of an expired token, nothing to revoke");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Logout rejected: token not verifiable");
                return Err(AuthError::Unauthenticated(e.to_string()));
            }
        };

        let ttl = revocation_ttl(&claims, Utc::now());

        self.ledger.revoke(token, ttl).await.map_err(|e| {
            tracing::error!(identity = %claims.sub, error = %e, "Failed to record revocation");
            AuthError::LogoutFailure(e.to_string())
        })?;

        tracing::info!(identity = %claims.sub, ttl_secs = ttl.as_secs(), "Token revoked");
        Ok(())
    }

    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let claims = self
            .authenticator
            .validate_token(token)
            .map_err(|e| AuthError::Unauthenticated(e.to_string()))?;

        let verified = Self::verified_identity(&claims)?;

        match self.ledger.is_revoked(token).await {
            Ok(false) => Ok(verified),
            Ok(true) => {
                tracing::debug!(identity = %verified.identity, "Rejected revoked token");
                Err(AuthError::Unauthenticated(
                    "token has been revoked".to_string(),
                ))
            }
            Err(e) => {
                tracing::error!(identity = %verified.identity, error = %e, "Revocation status unavailable");
                Err(AuthError::LedgerUnavailable {
                    verified,
                    reason: e.to_string(),
                })
            }
        }
    }
}
