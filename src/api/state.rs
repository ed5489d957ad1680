//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::{UserId, UserRecord, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::{AuthService, TokenIssuer};
use crate::infrastructure::user::{
    CreateUserRequest, PasswordHasher, UpdateUserRequest, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub auth_service: Arc<dyn AuthServiceTrait>,
    pub tokens: Arc<dyn TokenIssuer>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        auth_service: Arc<dyn AuthServiceTrait>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            user_service,
            auth_service,
            tokens,
        }
    }
}

/// Trait for user CRUD operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<UserRecord, DomainError>;
    async fn get(&self, id: UserId) -> Result<UserRecord, DomainError>;
    async fn list(&self) -> Result<Vec<UserRecord>, DomainError>;
    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<(), DomainError>;
    async fn delete(&self, id: UserId) -> Result<(), DomainError>;
}

/// Trait for authentication operations
#[async_trait::async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<Option<String>, DomainError>;
    async fn change_password(&self, id: UserId, new_password: &str) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn create(&self, request: CreateUserRequest) -> Result<UserRecord, DomainError> {
        UserService::create(self, request).await
    }

    async fn get(&self, id: UserId) -> Result<UserRecord, DomainError> {
        UserService::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<UserRecord>, DomainError> {
        UserService::list(self).await
    }

    async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<(), DomainError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        UserService::delete(self, id).await
    }
}

#[async_trait::async_trait]
impl<R, H> AuthServiceTrait for AuthService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<String>, DomainError> {
        AuthService::authenticate(self, email, password).await
    }

    async fn change_password(&self, id: UserId, new_password: &str) -> Result<(), DomainError> {
        AuthService::change_password(self, id, new_password).await
    }
}
