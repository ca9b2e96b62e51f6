use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::credential::errors::AuthError;
use crate::credential::errors::ValidationError;

pub mod login;
pub mod logout;
pub mod register;
pub mod session;
pub mod verify_token;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    Conflict(String),
    Unauthorized(String),
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

/// Unknown identity and wrong password share one message. Store, ledger
/// and hashing failures never expose driver detail.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(e) => e.into(),
            AuthError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AuthError::NotFound(_) | AuthError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            AuthError::Unauthenticated(_) => ApiError::Unauthorized(INVALID_TOKEN.to_string()),
            AuthError::StoreUnavailable(_) => {
                ApiError::ServiceUnavailable("Credential store unavailable".to_string())
            }
            AuthError::LedgerUnavailable { .. } => {
                ApiError::ServiceUnavailable("Revocation ledger unavailable".to_string())
            }
            AuthError::LogoutFailure(_) => {
                ApiError::ServiceUnavailable("Failed to log out".to_string())
            }
            AuthError::HashingFailure(_) | AuthError::TokenIssuance(_) => {
                ApiError::InternalServerError("Internal error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mockall::mock;

    use super::*;
    use crate::credential::errors::IdentityError;
    use crate::credential::models::CredentialRecord;
    use crate::credential::models::IssuedToken;
    use crate::credential::models::LedgerPolicy;
    use crate::credential::models::LoginCommand;
    use crate::credential::models::RegisterCommand;
    use crate::credential::models::VerifiedIdentity;
    use crate::credential::ports::AuthServicePort;
    use crate::inbound::http::router::AppState;

    mock! {
        pub TestAuthService {}

        #[async_trait]
        impl AuthServicePort for TestAuthService {
            async fn register(&self, command: RegisterCommand) -> Result<CredentialRecord, AuthError>;
            async fn login(&self, command: LoginCommand) -> Result<IssuedToken, AuthError>;
            async fn logout(&self, token: &str) -> Result<(), AuthError>;
            async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
        }
    }

    pub(crate) fn state(service: MockTestAuthService, ledger_policy: LedgerPolicy) -> AppState {
        AppState {
            auth_service: Arc::new(service),
            ledger_policy,
        }
    }

    #[test]
    fn test_unknown_identity_and_wrong_password_look_alike() {
        let not_found = ApiError::from(AuthError::NotFound("nobody@x.com".to_string()));
        let mismatch = ApiError::from(AuthError::InvalidCredentials);

        assert_eq!(not_found, mismatch);
        assert_eq!(
            mismatch,
            ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
        );
    }

    #[test]
    fn test_driver_detail_is_not_exposed() {
        let err = ApiError::from(AuthError::StoreUnavailable(
            "error communicating with database: Connection refused (os error 111)".to_string(),
        ));

        assert_eq!(
            err,
            ApiError::ServiceUnavailable("Credential store unavailable".to_string())
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ApiError::from(AuthError::Validation(ValidationError::Identity(
            IdentityError::Empty,
        )));

        assert_eq!(
            err,
            ApiError::UnprocessableEntity("Invalid email: Email is required".to_string())
        );
    }
}
