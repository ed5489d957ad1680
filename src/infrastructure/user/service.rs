//! User CRUD service

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::user::{
    validate_email, validate_name, validate_password, User, UserId, UserRecord, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request for updating a user's display name
#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub name: String,
}

/// CRUD orchestration over the user store
///
/// Maps entities to transfer records on the way out; the password hash
/// never leaves this layer.
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    ///
    /// The e-mail pre-check is an optimization; the store's unique index is
    /// the authoritative guard and also reports `Conflict` when two creates
    /// race on the same address.
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserRecord, DomainError> {
        validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(&request.email).await? {
            warn!(email = %request.email, "Rejected registration with e-mail already in use");
            return Err(DomainError::conflict(format!(
                "E-mail '{}' is already in use",
                request.email
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(UserId::new(), &request.name, &request.email, password_hash);

        let user = self.repository.create(user).await?;
        info!(user_id = %user.id(), "User created");

        Ok(UserRecord::from(&user))
    }

    /// Get a user by ID
    pub async fn get(&self, id: UserId) -> Result<UserRecord, DomainError> {
        let user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        Ok(UserRecord::from(&user))
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<UserRecord>, DomainError> {
        let users = self.repository.list().await?;
        debug!(count = users.len(), "Listed users");

        Ok(users.iter().map(UserRecord::from).collect())
    }

    /// Overwrite a user's display name; e-mail and password are untouched
    pub async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<(), DomainError> {
        validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.set_name(&request.name);
        self.repository.update(&user).await?;
        info!(user_id = %id, "User updated");

        Ok(())
    }

    /// Delete a user
    ///
    /// Deliberately lenient: deleting an unknown id succeeds without error.
    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        let removed = self.repository.delete(id).await?;

        if removed {
            info!(user_id = %id, "User deleted");
        } else {
            debug!(user_id = %id, "Delete requested for unknown user");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn make_request(name: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let record = service
            .create(make_request("Teste", "teste@teste.com", "SenhaSegura123"))
            .await
            .unwrap();

        assert_eq!(record.name, "Teste");
        assert_eq!(record.email, "teste@teste.com");

        // The returned record carries no password material
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("SenhaSegura123"));
    }

    #[tokio::test]
    async fn test_create_stores_hash_not_password() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(repository.clone(), Arc::new(Argon2Hasher::new()));

        service
            .create(make_request("Teste", "teste@teste.com", "SenhaSegura123"))
            .await
            .unwrap();

        let stored = repository
            .get_by_email("teste@teste.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash(), "SenhaSegura123");
        assert!(Argon2Hasher::new().verify("SenhaSegura123", stored.password_hash()));
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(repository.clone(), Arc::new(Argon2Hasher::new()));

        service
            .create(make_request("Primeiro", "teste@teste.com", "SenhaSegura123"))
            .await
            .unwrap();

        let result = service
            .create(make_request("Segundo", "teste@teste.com", "OutraSenha456"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        // No second write happened
        assert_eq!(repository.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_invalid_inputs() {
        let service = create_service();

        let result = service
            .create(make_request("", "teste@teste.com", "SenhaSegura123"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = service
            .create(make_request("Teste", "not-an-email", "SenhaSegura123"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = service
            .create(make_request("Teste", "teste@teste.com", "curta"))
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let service = create_service();

        let created = service
            .create(make_request("Teste", "teste@teste.com", "SenhaSegura123"))
            .await
            .unwrap();

        let record = service.get(created.id).await.unwrap();
        assert_eq!(record, created);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let service = create_service();

        let result = service.get(UserId::new()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list() {
        let service = create_service();

        service
            .create(make_request("Primeiro", "primeiro@teste.com", "SenhaSegura123"))
            .await
            .unwrap();
        service
            .create(make_request("Segundo", "segundo@teste.com", "SenhaSegura123"))
            .await
            .unwrap();

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_changes_name_only() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(repository.clone(), Arc::new(Argon2Hasher::new()));

        let created = service
            .create(make_request("Teste", "teste@teste.com", "SenhaSegura123"))
            .await
            .unwrap();
        let hash_before = repository
            .get(created.id)
            .await
            .unwrap()
            .unwrap()
            .password_hash()
            .to_string();

        service
            .update(
                created.id,
                UpdateUserRequest {
                    name: "Novo Nome".to_string(),
                },
            )
            .await
            .unwrap();

        let stored = repository.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name(), "Novo Nome");
        assert_eq!(stored.email(), "teste@teste.com");
        assert_eq!(stored.password_hash(), hash_before);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let service = create_service();

        let result = service
            .update(
                UserId::new(),
                UpdateUserRequest {
                    name: "Nome".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();

        let created = service
            .create(make_request("Teste", "teste@teste.com", "SenhaSegura123"))
            .await
            .unwrap();

        service.delete(created.id).await.unwrap();

        let result = service.get(created.id).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let service = create_service();

        // No error for an id that was never registered
        service.delete(UserId::new()).await.unwrap();
    }
}
