use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::credential::models::VerifiedIdentity;
use crate::inbound::http::router::AppState;

pub async fn verify_token(
    State(state): State<AppState>,
    Json(body): Json<VerifyTokenRequest>,
) -> Result<ApiSuccess<VerifiedIdentityData>, ApiError> {
    let outcome = state.auth_service.verify_token(&body.token).await;

    state
        .ledger_policy
        .resolve(outcome)
        .map_err(ApiError::from)
        .map(|ref verified| ApiSuccess::new(StatusCode::OK, verified.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyTokenRequest {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedIdentityData {
    pub email: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&VerifiedIdentity> for VerifiedIdentityData {
    fn from(verified: &VerifiedIdentity) -> Self {
        Self {
            email: verified.identity.as_str().to_string(),
            role: verified.role.as_str().to_string(),
            expires_at: verified.expires_at,
        }
    }
}
