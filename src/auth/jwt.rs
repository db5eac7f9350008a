//! JWT Token Handler
//! Issues and verifies the signed access tokens that back every protected route.

use crate::auth::models::{Claims, User};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// JWT handler for token operations.
///
/// The signing secret is injected at construction and lives for the process;
/// it is never read from anywhere else at request time.
pub struct JwtHandler {
    secret: String,
    expiration_hours: i64,
}

impl JwtHandler {
    /// Create a new JWT handler with the given signing secret.
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expiration_hours: 1, // tokens are valid for one hour
        }
    }

    /// Generate a signed token for a user. Returns the token and its
    /// lifetime in seconds.
    pub fn generate_token(&self, user: &User) -> Result<(String, usize)> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::hours(self.expiration_hours))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let expires_in = (self.expiration_hours * 3600) as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            exp: expiration,
        };

        debug!(
            "Generating JWT for user {} ({}), expires in {}h",
            user.email, user.id, self.expiration_hours
        );

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to generate JWT")?;

        Ok((token, expires_in))
    }

    /// Verify a token's signature and expiry and extract its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        // Expiry is exact: no clock leeway, a token past its instant is dead
        let mut validation = Validation::default();
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .context("Invalid or expired token")?;

        debug!("Validated JWT for user {}", decoded.claims.email);

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::UserRole;
    use uuid::Uuid;

    fn create_test_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@healthhub.dev".to_string(),
            password_hash: "hash".to_string(),
            full_name: "Test User".to_string(),
            role,
            specialization: None,
            license: None,
            company_name: None,
            contact_person: None,
            address: None,
            phone: None,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let user = create_test_user(UserRole::Patient);

        let (token, expires_in) = handler.generate_token(&user).unwrap();
        assert!(!token.is_empty());
        assert_eq!(expires_in, 3600); // one hour in seconds

        let claims = handler.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Patient);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());

        let result = handler.validate_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1".to_string());
        let handler2 = JwtHandler::new("secret2".to_string());
        let user = create_test_user(UserRole::Doctor);

        let (token, _) = handler1.generate_token(&user).unwrap();

        // A token signed with one secret must not verify under another
        let result = handler2.validate_token(&token);
        assert!(result.is_err());
    }

    fn token_with_exp(secret: &str, user: &User, exp: i64) -> String {
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            exp: exp as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_expired_token_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let user = create_test_user(UserRole::Doctor);

        let token = token_with_exp(
            "test-secret-key-12345",
            &user,
            Utc::now().timestamp() - 3600,
        );

        assert!(handler.validate_token(&token).is_err());
    }

    #[test]
    fn test_token_just_past_expiry_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let user = create_test_user(UserRole::Patient);

        // Seconds past the instant, well inside the default 60s JWT leeway.
        // Expiry is a hard cutoff here, so this must fail.
        let token = token_with_exp("test-secret-key-12345", &user, Utc::now().timestamp() - 5);
        assert!(handler.validate_token(&token).is_err());

        // And a token still inside its window is fine
        let token = token_with_exp("test-secret-key-12345", &user, Utc::now().timestamp() + 60);
        assert!(handler.validate_token(&token).is_ok());
    }

    #[test]
    fn test_token_contains_all_claims() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let user = create_test_user(UserRole::Lab);

        let (token, _) = handler.generate_token(&user).unwrap();
        let claims = handler.validate_token(&token).unwrap();

        assert_eq!(claims.email, "test@healthhub.dev");
        assert_eq!(claims.role, UserRole::Lab);
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }
}
