use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::INVALID_CREDENTIALS;
use crate::credential::models::IssuedToken;
use crate::credential::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A malformed identity cannot belong to an account.
    let command = LoginCommand::parse(&body.email, body.password)
        .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    state
        .auth_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|ref issued| ApiSuccess::new(StatusCode::OK, issued.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub email: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&IssuedToken> for LoginResponseData {
    fn from(issued: &IssuedToken) -> Self {
        Self {
            token: issued.token.clone(),
            email: issued.identity.as_str().to_string(),
            role: issued.role.as_str().to_string(),
            expires_at: issued.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::errors::AuthError;
    use crate::credential::models::LedgerPolicy;
    use crate::credential::models::Role;
    use crate::inbound::http::handlers::tests::state;
    use crate::inbound::http::handlers::tests::MockTestAuthService;

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let mut service = MockTestAuthService::new();
        service.expect_login().times(1).returning(|command| {
            Ok(IssuedToken {
                token: "header.payload.signature".to_string(),
                identity: command.identity,
                role: Role::Admin,
                expires_at: Utc::now(),
            })
        });

        let ApiSuccess(status, Json(body)) = login(
            State(state(service, LedgerPolicy::default())),
            Json(request("a@x.com", "pw")),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data.token, "header.payload.signature");
        assert_eq!(body.data.role, "admin");
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        for error in [
            AuthError::NotFound("a@x.com".to_string()),
            AuthError::InvalidCredentials,
        ] {
            let mut service = MockTestAuthService::new();
            service
                .expect_login()
                .return_once(move |_| Err(error));

            let result = login(
                State(state(service, LedgerPolicy::default())),
                Json(request("a@x.com", "pw")),
            )
            .await;

            assert_eq!(
                result.unwrap_err(),
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            );
        }
    }

    #[tokio::test]
    async fn test_login_with_malformed_email_is_invalid_credentials() {
        let mut service = MockTestAuthService::new();
        service.expect_login().times(0);

        let result = login(
            State(state(service, LedgerPolicy::default())),
            Json(request("nobody", "pw")),
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
        );
    }
}
