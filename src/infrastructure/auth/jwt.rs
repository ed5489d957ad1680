//! JWT token issuance and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

use crate::domain::user::User;
use crate::domain::DomainError;

/// Claims carried by an access token
///
/// Claims are signed, not encrypted: anyone holding the token can read
/// them, but only the service can mint or alter them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// E-mail of the authenticated user
    pub email: String,
    /// Issued at (Unix epoch seconds)
    pub iat: i64,
    /// Expiration (Unix epoch seconds)
    pub exp: i64,
}

impl AccessTokenClaims {
    /// Build claims for a user with the given time to live
    pub fn new(user: &User, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(ttl_hours);

        Self {
            sub: user.id().as_uuid(),
            email: user.email().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Configuration for the token issuer
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Symmetric signing secret; must be non-empty
    pub secret: String,
    /// Token time to live in hours
    pub ttl_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_hours,
        }
    }
}

/// Trait for bearer-token operations
pub trait TokenIssuer: Send + Sync + Debug {
    /// Issue a signed token for a user
    fn issue(&self, user: &User) -> Result<String, DomainError>;

    /// Validate a token's signature and expiry and return the claims
    fn validate(&self, token: &str) -> Result<AccessTokenClaims, DomainError>;
}

/// HMAC-SHA256 token issuer
#[derive(Clone)]
pub struct JwtService {
    ttl_hours: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl_hours", &self.ttl_hours)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a token issuer from configuration
    ///
    /// An empty secret is a configuration error; callers treat it as fatal
    /// at startup.
    pub fn new(config: JwtConfig) -> Result<Self, DomainError> {
        if config.secret.is_empty() {
            return Err(DomainError::configuration(
                "JWT signing secret is not configured",
            ));
        }

        Ok(Self {
            ttl_hours: config.ttl_hours,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        })
    }
}

impl TokenIssuer for JwtService {
    fn issue(&self, user: &User) -> Result<String, DomainError> {
        let claims = AccessTokenClaims::new(user, self.ttl_hours);

        // Header::default() is HS256
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<AccessTokenClaims, DomainError> {
        let token_data =
            decode::<AccessTokenClaims>(token, &self.decoding_key, &Validation::default())
                .map_err(|e| DomainError::validation(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;

    fn create_test_user() -> User {
        User::new(UserId::new(), "Teste", "teste@teste.com", "hashed_password")
    }

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret-key-12345", 1)).unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let service = create_service();
        let user = create_test_user();

        let token = service.issue(&user).unwrap();
        assert!(!token.is_empty());

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, user.id().as_uuid());
        assert_eq!(claims.email, "teste@teste.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let result = JwtService::new(JwtConfig::new("", 1));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        assert!(service.validate("not-a-token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new(JwtConfig::new("secret-1", 1)).unwrap();
        let service2 = JwtService::new(JwtConfig::new("secret-2", 1)).unwrap();

        let token = service1.issue(&create_test_user()).unwrap();

        assert!(service2.validate(&token).is_err());
    }

    #[test]
    fn test_tampered_claims() {
        let service = create_service();
        let token = service.issue(&create_test_user()).unwrap();

        // Flip a character inside the claims segment
        let (header, rest) = token.split_once('.').unwrap();
        let (payload, signature) = rest.split_once('.').unwrap();
        let mut chars: Vec<char> = payload.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let payload: String = chars.into_iter().collect();
        let tampered = format!("{}.{}.{}", header, payload, signature);

        assert!(service.validate(&tampered).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = create_service();
        let user = create_test_user();

        // Craft claims that expired an hour ago
        let past = Utc::now() - Duration::hours(1);
        let claims = AccessTokenClaims {
            sub: user.id().as_uuid(),
            email: user.email().to_string(),
            iat: (past - Duration::hours(1)).timestamp(),
            exp: past.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-12345"),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }
}
