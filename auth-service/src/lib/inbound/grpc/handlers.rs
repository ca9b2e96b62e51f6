use crate::credential::models::CredentialRecord;
use crate::credential::models::IssuedToken;
use crate::credential::models::VerifiedIdentity;
use crate::proto::LoginResponse;
use crate::proto::RegisterResponse;
use crate::proto::VerifyTokenResponse;

pub mod login;
pub mod logout;
pub mod register;
pub mod verify_token;

impl From<CredentialRecord> for RegisterResponse {
    fn from(record: CredentialRecord) -> Self {
        Self {
            user_id: record.id.to_string(),
            message: "User registered successfully".to_string(),
        }
    }
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at.timestamp(),
        }
    }
}

impl From<VerifiedIdentity> for VerifyTokenResponse {
    fn from(verified: VerifiedIdentity) -> Self {
        Self {
            email: verified.identity.as_str().to_string(),
            role: verified.role.as_str().to_string(),
            expires_at: verified.expires_at.timestamp(),
        }
    }
}
