use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::{AppError, ErrorCode};
use crate::types::auth::{AccountRole, AuthUser, Claims};

pub const DEFAULT_JWT_SECRET: &str = "development-secret-change-in-production";

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let claims = validate_jwt(token)?;

        if claims.is_expired() {
            return Err(AppError::new(ErrorCode::TokenExpired, "token has expired"));
        }

        Ok(AuthUser::from(claims))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::unauthorized("missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("invalid authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("authorization header must use Bearer scheme"))
}

fn validate_jwt(token: &str) -> Result<Claims, AppError> {
    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::new(ErrorCode::TokenExpired, "token has expired")
        }
        _ => AppError::new(ErrorCode::TokenInvalid, "invalid token"),
    })?;

    Ok(token_data.claims)
}

/// Require the `member` role. Unauthenticated callers get a 401, other roles a 403.
pub struct MemberUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for MemberUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != AccountRole::Member {
            return Err(AppError::new(ErrorCode::MemberRoleRequired, "member access required"));
        }
        Ok(Self(user))
    }
}
