use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id as string
    pub exp: usize,
    pub iat: usize,
}

/// Generate a JWT token for a user
///
/// Tokens are normally issued by the account service; this exists for tooling and tests
/// that need to talk to the study API directly.
pub fn generate_jwt_token(
    user_id: Uuid,
    jwt_secret: &str,
    expiry_hours: i64,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
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

/// Verify and decode a JWT token
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

        let token = generate_jwt_token(user_id, SECRET, 24).expect("Failed to generate token");
        assert!(!token.is_empty(), "Token should not be empty");

        let claims = verify_jwt_token(&token, SECRET).expect("Failed to verify token");
        assert_eq!(claims.sub, user_id.to_string());
        assert!(
            claims.exp > claims.iat,
            "Expiration should be after issued at"
        );
    }

    #[test]
    fn test_verify_jwt_token_with_wrong_secret() {
        let token =
            generate_jwt_token(Uuid::new_v4(), SECRET, 24).expect("Failed to generate token");

        let result = verify_jwt_token(&token, "wrong_jwt_secret_minimum_32_characters_long");
        match result {
            Err(ApiError::Auth(msg)) => {
                assert!(msg.contains("Invalid or expired token"));
            }
            _ => panic!("Expected Auth error"),
        }
    }

    #[test]
    fn test_verify_expired_jwt_token() {
        // Well past the default 60s leeway
        let token =
            generate_jwt_token(Uuid::new_v4(), SECRET, -2).expect("Failed to generate token");

        assert!(matches!(
            verify_jwt_token(&token, SECRET),
            Err(ApiError::Auth(_))
        ));
    }

    #[test]
    fn test_verify_invalid_jwt_token() {
        let result = verify_jwt_token("invalid.jwt.token", SECRET);
        assert!(matches!(result, Err(ApiError::Auth(_))));
    }
}
