//! Bearer-token authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::auth::AccessTokenClaims;

/// Extractor that requires a valid bearer token
///
/// Validates signature and expiry only; handlers receive the token's
/// claims. No store lookup happens here.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub AccessTokenClaims);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        debug!("Validating bearer token");

        let claims = state
            .tokens
            .validate(&token)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Extract the token from the Authorization header
fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide a token via 'Authorization: Bearer <token>'",
    ))
}
