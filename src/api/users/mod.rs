//! User CRUD endpoints
//!
//! Registration is open; reads, updates, and deletes require a bearer
//! token.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::api::middleware::AuthenticatedUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{UserId, UserRecord};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Create the user CRUD router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/", get(list_users))
        .route("/{id}", get(get_user))
        .route("/{id}", put(update_user))
        .route("/{id}", delete(delete_user))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct CreateUserApiRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Name update request
#[derive(Debug, Deserialize)]
pub struct UpdateUserApiRequest {
    pub name: String,
}

/// POST /usuarios
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserApiRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(email = %request.email, "Registering user");

    let record = state
        .user_service
        .create(CreateUserRequest {
            name: request.name,
            email: request.email,
            password: request.password,
        })
        .await
        .map_err(ApiError::from)?;

    let location = format!("/usuarios/{}", record.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    ))
}

/// GET /usuarios/{id}
pub async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(_): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserRecord>, ApiError> {
    let record = state
        .user_service
        .get(UserId::from_uuid(id))
        .await
        .map_err(ApiError::from)?;

    Ok(Json(record))
}

/// GET /usuarios
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(_): AuthenticatedUser,
) -> Result<Json<Vec<UserRecord>>, ApiError> {
    let records = state.user_service.list().await.map_err(ApiError::from)?;

    Ok(Json(records))
}

/// PUT /usuarios/{id}
pub async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(_): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .update(UserId::from_uuid(id), UpdateUserRequest { name: request.name })
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /usuarios/{id}
///
/// Lenient by design: deleting an id that does not exist still returns
/// 204.
pub async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(_): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .delete(UserId::from_uuid(id))
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
