use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credential::errors::ValidationError;
use crate::credential::models::CredentialRecord;
use crate::credential::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref record| ApiSuccess::new(StatusCode::CREATED, record.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: String,
    name: String,
    password: String,
    #[serde(default)]
    role: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ValidationError> {
        RegisterCommand::parse(&self.email, &self.name, self.password, &self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

impl From<&CredentialRecord> for RegisterResponseData {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id.to_string(),
            email: record.identity.as_str().to_string(),
            name: record.display_name.as_str().to_string(),
            role: record.role.as_str().to_string(),
            created_at: record.created_at,
            message: "User registered successfully".to_string(),
        }
    }
}
