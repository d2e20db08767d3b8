use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use uuid::Uuid;

use super::jwt::verify_jwt_token;
use crate::{error::ApiError, state::AuthConfig};

/// Legacy header carrying the raw token, accepted alongside `Authorization: Bearer`
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated user extractor
///
/// Use this in route handlers to ensure the user is authenticated.
/// The token is read from `Authorization: Bearer <token>` or, failing that,
/// from the `x-auth-token` header.
///
/// # Example
/// ```
/// use axum::extract::State;
/// use wl_api::{error::ApiError, auth::AuthUser, ApiState};
///
/// async fn protected_route(
///     auth_user: AuthUser,
///     State(state): State<ApiState>,
/// ) -> Result<(), ApiError> {
///     // auth_user.user_id is available
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// `sub` claim of the verified token
    pub user_id: Uuid,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let from_authorization = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let from_legacy = || {
        parts
            .headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    };

    from_authorization
        .or_else(from_legacy)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_config = AuthConfig::from_ref(state);

        let token =
            bearer_token(parts).ok_or_else(|| ApiError::Auth("Not authenticated".to_string()))?;

        let claims = verify_jwt_token(&token, &auth_config.jwt_secret)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Auth("Invalid user ID in token".to_string()))?;

        Ok(Self { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/study/scheduled");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).expect("valid request").into_parts().0
    }

    #[test]
    fn test_bearer_token_sources() {
        assert_eq!(
            bearer_token(&parts_with(&[("authorization", "Bearer abc")])).as_deref(),
            Some("abc")
        );
        assert_eq!(
            bearer_token(&parts_with(&[("x-auth-token", "def")])).as_deref(),
            Some("def")
        );
        assert_eq!(
            bearer_token(&parts_with(&[
                ("authorization", "Bearer abc"),
                ("x-auth-token", "def")
            ]))
            .as_deref(),
            Some("abc")
        );
        assert_eq!(bearer_token(&parts_with(&[("authorization", "Basic abc")])), None);
        assert_eq!(bearer_token(&parts_with(&[("x-auth-token", "  ")])), None);
        assert_eq!(bearer_token(&parts_with(&[])), None);
    }
}
