use tonic::Status;

use crate::credential::models::RegisterCommand;
use crate::credential::ports::AuthServicePort;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register(
    service: &dyn AuthServicePort,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    let command =
        RegisterCommand::parse(&request.email, &request.name, request.password, &request.role)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

    let record = service.register(command).await?;

    Ok(record.into())
}
