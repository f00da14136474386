use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::jwt::verify_token;
use crate::auth::{find_user, AuthError};
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// A request carrying a valid bearer token for an account that still exists.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

/// Verifies the bearer token and loads its user. Tokens outlive deleted
/// accounts, so a valid signature alone is not enough.
async fn authenticated_user(parts: &Parts, state: &AppState) -> Result<UserRow, AppError> {
    let token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_whitespace().nth(1))
        .ok_or(AuthError::MissingToken)?;

    let id = verify_token(token, &state.config.jwt_secret)?;

    find_user(&state.db, id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = authenticated_user(parts, state).await?;
        Ok(AuthUser { id: user.id })
    }
}

/// A signed-in user whose role is `admin`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserRow);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = authenticated_user(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::Forbidden(
                "Access denied: administrator privileges required".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}
