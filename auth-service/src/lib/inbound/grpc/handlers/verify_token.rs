use tonic::Status;

use crate::credential::models::LedgerPolicy;
use crate::credential::ports::AuthServicePort;
use crate::proto::VerifyTokenRequest;
use crate::proto::VerifyTokenResponse;

/// Interceptor contract for other services: identity and role behind a token.
pub async fn verify_token(
    service: &dyn AuthServicePort,
    ledger_policy: LedgerPolicy,
    request: VerifyTokenRequest,
) -> Result<VerifyTokenResponse, Status> {
    let outcome = service.verify_token(&request.token).await;
    let verified = ledger_policy.resolve(outcome)?;

    Ok(verified.into())
}
