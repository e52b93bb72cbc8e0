use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id as string
    pub email: String,
    pub exp: usize,
    pub iat: usize,
}

/// Issue a token for a user
///
/// Tokens normally come from the account service sharing `JWT_SECRET`;
/// this is used by tooling and tests.
pub fn generate_jwt_token(
    user_id: Uuid,
    email: String,
    jwt_secret: &str,
    expiry_hours: i64,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email,
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp() as usize,
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a token
pub fn verify_jwt_token(token: &str, jwt_secret: &str) -> Result<Claims, ApiError> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Auth("Invalid or expired token".to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_jwt_secret_minimum_32_characters_long";

    #[test]
    fn test_generate_and_verify_jwt_token() {
        let user_id = Uuid::new_v4();

        let token = generate_jwt_token(user_id, "student@example.com".to_string(), SECRET, 24)
            .expect("Failed to generate token");
        let claims = verify_jwt_token(&token, SECRET).expect("Failed to verify token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "student@example.com");
        let lifetime = claims.exp - claims.iat;
        assert!((86390..=86410).contains(&lifetime), "got {lifetime} seconds");
    }

    #[test]
    fn test_verify_jwt_token_with_wrong_secret() {
        let token = generate_jwt_token(Uuid::new_v4(), "a@b.c".to_string(), SECRET, 24)
            .expect("Failed to generate token");

        match verify_jwt_token(&token, "wrong_jwt_secret_minimum_32_characters_long") {
            Err(ApiError::Auth(msg)) => assert!(msg.contains("Invalid or expired token")),
            other => panic!("Expected Auth error, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_expired_jwt_token() {
        // Past the default 60 second leeway
        let token = generate_jwt_token(Uuid::new_v4(), "a@b.c".to_string(), SECRET, -1)
            .expect("Failed to generate token");

        assert!(matches!(
            verify_jwt_token(&token, SECRET),
            Err(ApiError::Auth(_))
        ));
    }

    #[test]
    fn test_verify_malformed_jwt_token() {
        assert!(matches!(
            verify_jwt_token("invalid.jwt.token", SECRET),
            Err(ApiError::Auth(_))
        ));
    }
}
