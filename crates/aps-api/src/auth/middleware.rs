use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use uuid::Uuid;

use super::jwt::verify_jwt_token;
use crate::{error::ApiError, state::AuthConfig};

/// Authenticated user extractor
///
/// Reads `Authorization: Bearer <token>` and rejects the request with 401
/// when the token is missing or invalid.
///
/// # Example
/// ```
/// use axum::extract::State;
/// use aps_api::{error::ApiError, auth::AuthUser, ApiState};
///
/// async fn protected_route(
///     auth_user: AuthUser,
///     State(state): State<ApiState>,
/// ) -> Result<(), ApiError> {
///     // auth_user.user_id and auth_user.email are available
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_config = AuthConfig::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Auth("Not authenticated".to_string()))?;

        let claims = verify_jwt_token(token, &auth_config.jwt_secret)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Auth("Invalid user ID in token".to_string()))?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_jwt_token;
    use axum::http::Request;

    const SECRET: &str = "test_jwt_secret_minimum_32_characters_long";

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
        }
    }

    async fn extract(authorization: Option<String>) -> Result<AuthUser, ApiError> {
        let mut builder = Request::builder().uri("/v1/plan");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &config()).await
    }

    #[tokio::test]
    async fn test_bearer_token_accepted() {
        let user_id = Uuid::new_v4();
        let token = generate_jwt_token(user_id, "s@example.com".to_string(), SECRET, 1).unwrap();

        let user = extract(Some(format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "s@example.com");
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_rejected() {
        assert!(matches!(extract(None).await, Err(ApiError::Auth(_))));
        assert!(matches!(
            extract(Some("Basic abc".to_string())).await,
            Err(ApiError::Auth(_))
        ));
        assert!(matches!(
            extract(Some("Bearer ".to_string())).await,
            Err(ApiError::Auth(_))
        ));
    }
}
