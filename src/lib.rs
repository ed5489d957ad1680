//! Usuarios API
//!
//! A minimal user-account microservice: registration, e-mail/password
//! authentication with signed bearer tokens, password change, and
//! token-gated CRUD over user records.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use config::DatabaseBackend;
use domain::DomainError;
use infrastructure::auth::{AuthService, JwtConfig, JwtService};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};

/// Create the application state with all services initialized
///
/// Fails with a `Configuration` error when the token-signing secret is
/// absent; the process must not come up without it.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let secret = config
        .token_secret()
        .ok_or_else(|| DomainError::configuration("JWT signing secret is not configured"))?;

    let tokens = Arc::new(JwtService::new(JwtConfig::new(
        secret,
        config.auth.token_ttl_hours,
    ))?);
    let hasher = Arc::new(Argon2Hasher::new());

    match config.database.backend {
        DatabaseBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

            info!("Connecting to PostgreSQL...");
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
            info!("PostgreSQL connection established");

            let repository = Arc::new(PostgresUserRepository::new(pool));

            Ok(AppState::new(
                Arc::new(UserService::new(repository.clone(), hasher.clone())),
                Arc::new(AuthService::new(repository, hasher, tokens.clone())),
                tokens,
            ))
        }
        DatabaseBackend::Memory => {
            info!("Using in-memory user store");
            let repository = Arc::new(InMemoryUserRepository::new());

            Ok(AppState::new(
                Arc::new(UserService::new(repository.clone(), hasher.clone())),
                Arc::new(AuthService::new(repository, hasher, tokens.clone())),
                tokens,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, DatabaseConfig};

    fn memory_config(secret: &str) -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                backend: DatabaseBackend::Memory,
            },
            auth: AuthConfig {
                secret: secret.to_string(),
                token_ttl_hours: 1,
            },
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_create_app_state_in_memory() {
        let state = create_app_state(&memory_config("test-secret-key-12345"))
            .await
            .unwrap();

        // The wired services share one store
        let record = state
            .user_service
            .create(infrastructure::user::CreateUserRequest {
                name: "Teste".to_string(),
                email: "teste@teste.com".to_string(),
                password: "SenhaSegura123".to_string(),
            })
            .await
            .unwrap();

        let token = state
            .auth_service
            .authenticate("teste@teste.com", "SenhaSegura123")
            .await
            .unwrap()
            .expect("expected a token");

        let claims = state.tokens.validate(&token).unwrap();
        assert_eq!(claims.sub, record.id.as_uuid());
    }
}
