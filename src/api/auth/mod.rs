//! Authentication endpoints
//!
//! Login (token issuance) and password change.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{validate_email, validate_password, UserId};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/change-password/{id}", post(change_password))
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Password change request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub new_password: String,
    pub confirm_new_password: String,
}

/// Login with e-mail and password
///
/// POST /auth/login
///
/// Returns a signed bearer token on success, 401 on bad credentials.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate_email(&request.email).map_err(|e| ApiError::bad_request(e.to_string()))?;
    validate_password(&request.password).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let token = state
        .auth_service
        .authenticate(&request.email, &request.password)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    Ok(Json(LoginResponse { token }))
}

/// Replace a user's password
///
/// POST /auth/change-password/{id}
///
/// Not gated behind token authentication, matching the surface it
/// reproduces.
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if request.new_password != request.confirm_new_password {
        return Err(ApiError::bad_request(
            "New password and confirmation do not match",
        ));
    }

    state
        .auth_service
        .change_password(UserId::from_uuid(id), &request.new_password)
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
