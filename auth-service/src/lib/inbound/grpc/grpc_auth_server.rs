use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::handlers::login;
use super::handlers::logout;
use super::handlers::register;
use super::handlers::verify_token;
use crate::credential::models::LedgerPolicy;
use crate::credential::ports::AuthServicePort;
use crate::proto::auth_service_server::AuthService as AuthServiceProto;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::LogoutRequest;
use crate::proto::LogoutResponse;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;
use crate::proto::VerifyTokenRequest;
use crate::proto::VerifyTokenResponse;

pub struct AuthGrpcService {
    service: Arc<dyn AuthServicePort>,
    ledger_policy: LedgerPolicy,
}

impl AuthGrpcService {
    pub fn new(service: Arc<dyn AuthServicePort>, ledger_policy: LedgerPolicy) -> Self {
        Self {
            service,
            ledger_policy,
        }
    }
}

#[tonic::async_trait]
impl AuthServiceProto for AuthGrpcService {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let response = register::register(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let response = login::login(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn logout(
        &self,
        request: Request<LogoutRequest>,
    ) -> Result<Response<LogoutResponse>, Status> {
        let response = logout::logout(self.service.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn verify_token(
        &self,
        request: Request<VerifyTokenRequest>,
    ) -> Result<Response<VerifyTokenResponse>, Status> {
        let response = verify_token::verify_token(
            self.service.as_ref(),
            self.ledger_policy,
            request.into_inner(),
        )
        .await?;
        Ok(Response::new(response))
    }
}
