//! Authentication service

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::user::{validate_password, UserId, UserRepository};
use crate::domain::DomainError;

use super::jwt::TokenIssuer;
use crate::infrastructure::user::PasswordHasher;

/// Credential verification, token issuance, and password change
#[derive(Debug)]
pub struct AuthService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<dyn TokenIssuer>,
}

impl<R: UserRepository, H: PasswordHasher> AuthService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self {
            repository,
            hasher,
            tokens,
        }
    }

    /// Verify credentials and issue a signed token
    ///
    /// Returns `Ok(None)` when the e-mail is unknown or the password does
    /// not verify; callers surface that as unauthorized, not as an error.
    /// The two causes are indistinguishable to the caller.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<String>, DomainError> {
        let Some(user) = self.repository.get_by_email(email).await? else {
            warn!(email = %email, "Authentication failed");
            return Ok(None);
        };

        if !self.hasher.verify(password, user.password_hash()) {
            warn!(email = %email, "Authentication failed");
            return Ok(None);
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id(), "Authentication succeeded");

        Ok(Some(token))
    }

    /// Replace a user's password with a freshly hashed one
    pub async fn change_password(
        &self,
        id: UserId,
        new_password: &str,
    ) -> Result<(), DomainError> {
        validate_password(new_password).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        let new_hash = self.hasher.hash(new_password)?;
        user.set_password_hash(new_hash);
        self.repository.update(&user).await?;

        info!(user_id = %id, "Password changed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::auth::jwt::{JwtConfig, JwtService};
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository};

    fn create_jwt_service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret-key-12345", 1)).unwrap()
    }

    fn create_service() -> AuthService<InMemoryUserRepository, Argon2Hasher> {
        AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
            Arc::new(create_jwt_service()),
        )
    }

    async fn create_service_with_user(
        email: &str,
        password: &str,
    ) -> (AuthService<InMemoryUserRepository, Argon2Hasher>, UserId) {
        let hasher = Argon2Hasher::new();
        let user = User::new(UserId::new(), "Teste", email, hasher.hash(password).unwrap());
        let id = user.id();

        let repository = Arc::new(InMemoryUserRepository::with_users(vec![user]));
        let service = AuthService::new(
            repository,
            Arc::new(hasher),
            Arc::new(create_jwt_service()),
        );

        (service, id)
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let (service, id) = create_service_with_user("teste@teste.com", "SenhaSegura123").await;

        let token = service
            .authenticate("teste@teste.com", "SenhaSegura123")
            .await
            .unwrap()
            .expect("expected a token");

        // The token validates and carries the user's identity
        let claims = create_jwt_service().validate(&token).unwrap();
        assert_eq!(claims.sub, id.as_uuid());
        assert_eq!(claims.email, "teste@teste.com");
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let (service, _) = create_service_with_user("teste@teste.com", "SenhaSegura123").await;

        let result = service
            .authenticate("teste@teste.com", "SenhaErrada456")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let service = create_service();

        let result = service
            .authenticate("desconhecido@teste.com", "SenhaSegura123")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_change_password_unknown_id() {
        let service = create_service();

        let result = service.change_password(UserId::new(), "NovaSenha456").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_change_password_replaces_hash() {
        let (service, id) = create_service_with_user("teste@teste.com", "SenhaAntiga123").await;

        service.change_password(id, "NovaSenha456").await.unwrap();

        // Old password no longer authenticates
        assert!(service
            .authenticate("teste@teste.com", "SenhaAntiga123")
            .await
            .unwrap()
            .is_none());

        // New one does
        assert!(service
            .authenticate("teste@teste.com", "NovaSenha456")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_change_password_validates_length() {
        let (service, id) = create_service_with_user("teste@teste.com", "SenhaSegura123").await;

        let result = service.change_password(id, "curta").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        // Original password still works
        assert!(service
            .authenticate("teste@teste.com", "SenhaSegura123")
            .await
            .unwrap()
            .is_some());
    }
}
