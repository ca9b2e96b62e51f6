use tonic::Status;

use crate::credential::models::LoginCommand;
use crate::credential::ports::AuthServicePort;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

pub async fn login(
    service: &dyn AuthServicePort,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    let command = LoginCommand::parse(&request.email, request.password)
        .map_err(|_| Status::unauthenticated("Invalid credentials"))?;

    let issued = service.login(command).await?;

    Ok(issued.into())
}
