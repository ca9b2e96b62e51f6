use tonic::Status;

use crate::credential::ports::AuthServicePort;
use crate::proto::LogoutRequest;
use crate::proto::LogoutResponse;

pub async fn logout(
    service: &dyn AuthServicePort,
    request: LogoutRequest,
) -> Result<LogoutResponse, Status> {
    service.logout(&request.token).await?;

    Ok(LogoutResponse {
        message: "Logged out successfully".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use tonic::Code;

    use super::*;
    use crate::credential::errors::AuthError;
    use crate::inbound::http::handlers::tests::MockTestAuthService;

    fn request() -> LogoutRequest {
        LogoutRequest {
            token: "t".to_string(),
        }
    }

    #[tokio::test]
    async fn test_logout_success() {
        let mut service = MockTestAuthService::new();
        service
            .expect_logout()
            .withf(|token| token == "t")
            .times(1)
            .returning(|_| Ok(()));

        let response = logout(&service, request()).await.unwrap();

        assert_eq!(response.message, "Logged out successfully");
    }

    #[tokio::test]
    async fn test_ledger_write_failure_is_unavailable() {
        let mut service = MockTestAuthService::new();
        service
            .expect_logout()
            .returning(|_| Err(AuthError::LogoutFailure("connection refused".to_string())));

        let status = logout(&service, request()).await.unwrap_err();

        assert_eq!(status.code(), Code::Unavailable);
        assert_eq!(status.message(), "Failed to log out");
    }

    #[tokio::test]
    async fn test_forged_token_is_unauthenticated() {
        let mut service = MockTestAuthService::new();
        service
            .expect_logout()
            .returning(|_| Err(AuthError::Unauthenticated("InvalidSignature".to_string())));

        let status = logout(&service, request()).await.unwrap_err();

        assert_eq!(status.code(), Code::Unauthenticated);
    }
}
