use tonic::Status;

use crate::credential::errors::AuthError;

pub mod grpc_auth_server;
pub mod handlers;
pub mod interceptor;

pub use grpc_auth_server::AuthGrpcService;
pub use interceptor::AuthInterceptorLayer;

/// Same external messages as the HTTP API. Unknown identity and wrong
/// password are indistinguishable to the caller.
impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(e) => Status::invalid_argument(e.to_string()),
            AuthError::AlreadyExists(_) => Status::already_exists(err.to_string()),
            AuthError::NotFound(_) | AuthError::InvalidCredentials => {
                Status::unauthenticated("Invalid credentials")
            }
            AuthError::Unauthenticated(_) => Status::unauthenticated("Invalid or expired token"),
            AuthError::StoreUnavailable(_) => Status::unavailable("Credential store unavailable"),
            AuthError::LedgerUnavailable { .. } => {
                Status::unavailable("Revocation ledger unavailable")
            }
            AuthError::LogoutFailure(_) => Status::unavailable("Failed to log out"),
            AuthError::HashingFailure(_) | AuthError::TokenIssuance(_) => {
                Status::internal("Internal error")
            }
        }
    }
}
