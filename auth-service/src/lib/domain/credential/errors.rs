use thiserror::Error;

use crate::domain::credential::models::VerifiedIdentity;

/// Error for Identity validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Email is required")]
    Empty,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Name is required")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Error for plaintext password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password is required")]
    Empty,

    #[error("Password too long: maximum {max} bytes, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Malformed caller input. Raised before any store is touched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    Identity(#[from] IdentityError),

    #[error("Invalid name: {0}")]
    DisplayName(#[from] DisplayNameError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

/// Session cache failure. Never crosses the service boundary.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Session cache unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt session cache entry: {0}")]
    Corrupt(String),
}

/// Revocation ledger failure.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Revocation ledger unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for all authentication operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Identity already registered: {0}")]
    AlreadyExists(String),

    #[error("No credential for identity: {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    /// The token is structurally valid but its revocation status is unknown.
    /// Carries the verified identity so a caller may choose to fail open.
    #[error("Revocation ledger unavailable: {reason}")]
    LedgerUnavailable {
        verified: VerifiedIdentity,
        reason: String,
    },

    #[error("Logout failed: {0}")]
    LogoutFailure(String),

    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),
}
