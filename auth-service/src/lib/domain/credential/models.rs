use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::credential::errors::AuthError;
use crate::credential::errors::DisplayNameError;
use crate::credential::errors::IdentityError;
use crate::credential::errors::PasswordPolicyError;
use crate::credential::errors::RoleError;
use crate::credential::errors::ValidationError;

/// Durable credential record.
///
/// Owned by the credential store. The service only ever holds a copy read
/// for the duration of one call.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: CredentialId,
    pub identity: Identity,
    pub display_name: DisplayName,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generated durable identifier of a credential record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId(pub Uuid);

impl CredentialId {
    /// Generate a new random credential ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CredentialId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account identity (an email address).
///
/// Trimmed and lowercased on construction so that cache keys, ledger
/// lookups and the store's unique constraint all see one spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Create a validated identity.
    ///
    /// # Errors
    /// * `Empty` - Blank input
    /// * `InvalidFormat` - Not an RFC 5322 address
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(IdentityError::Empty);
        }

        email_address::EmailAddress::from_str(&normalized)
            .map(|_| Identity(normalized))
            .map_err(|e| IdentityError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Human readable account name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 255;

    pub fn new(raw: impl AsRef<str>) -> Result<Self, DisplayNameError> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(DisplayNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Student,
    Mentee,
    Admin,
}

impl Role {
    /// Parse a role name. Blank input selects the default role.
    ///
    /// # Errors
    /// * `Unknown` - Not one of the recognised role names
    pub fn parse(raw: &str) -> Result<Self, RoleError> {
        match raw.trim().to_lowercase().as_str() {
            "" => Ok(Role::default()),
            "student" => Ok(Role::Student),
            "mentee" => Ok(Role::Mentee),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Mentee => "mentee",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plaintext password as received from the caller.
///
/// `Debug` is redacted so the value cannot leak through logs or panics.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MAX_LENGTH: usize = 1024;

    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            Err(PasswordPolicyError::Empty)
        } else if raw.len() > Self::MAX_LENGTH {
            Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: raw.len(),
            })
        } else {
            Ok(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Projection of a credential record kept in the session cache.
///
/// May lag the store by up to one cache TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedCredential {
    pub password_hash: String,
    pub role: Role,
}

impl From<&CredentialRecord> for CachedCredential {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            password_hash: record.password_hash.clone(),
            role: record.role,
        }
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub identity: Identity,
    pub display_name: DisplayName,
    pub password: Password,
    pub role: Role,
}

impl RegisterCommand {
    /// Validate raw input into a register command.
    ///
    /// # Errors
    /// * `ValidationError` - Any field fails its value-type checks
    pub fn parse(
        identity: &str,
        display_name: &str,
        password: String,
        role: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            identity: Identity::new(identity)?,
            display_name: DisplayName::new(display_name)?,
            password: Password::new(password)?,
            role: Role::parse(role)?,
        })
    }
}

/// Command to authenticate with identity and password
#[derive(Debug)]
pub struct LoginCommand {
    pub identity: Identity,
    pub password: Password,
}

impl LoginCommand {
    pub fn parse(identity: &str, password: String) -> Result<Self, ValidationError> {
        Ok(Self {
            identity: Identity::new(identity)?,
            password: Password::new(password)?,
        })
    }
}

/// Bearer token handed out by a successful login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub identity: Identity,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Identity and role proven by a token that passed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub identity: Identity,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// What a protected endpoint does when the revocation ledger cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerPolicy {
    /// Reject the request.
    #[default]
    FailClosed,
    /// Accept the structurally valid token.
    FailOpen,
}

impl LedgerPolicy {
    /// Apply the policy to the outcome of token verification.
    pub fn resolve(
        self,
        result: Result<VerifiedIdentity, AuthError>,
    ) -> Result<VerifiedIdentity, AuthError> {
        match (self, result) {
            (LedgerPolicy::FailOpen, Err(AuthError::LedgerUnavailable { verified, reason })) => {
                tracing::warn!(
                    identity = %verified.identity,
                    reason = %reason,
                    "Revocation status unknown, accepting token under fail-open policy"
                );
                Ok(verified)
            }
            (_, result) => result,
        }
    }
}
