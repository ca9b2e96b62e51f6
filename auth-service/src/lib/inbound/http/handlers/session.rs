use axum::http::StatusCode;
use axum::Extension;

use super::verify_token::VerifiedIdentityData;
use super::ApiError;
use super::ApiSuccess;
use crate::credential::models::VerifiedIdentity;

/// Identity behind the bearer token, as established by the auth middleware.
pub async fn session(
    Extension(verified): Extension<VerifiedIdentity>,
) -> Result<ApiSuccess<VerifiedIdentityData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&verified).into()))
}
