//! Account authentication: argon2 password hashes and HS256 bearer tokens.
//!
//! Handlers opt in by taking `AuthUser` (any signed-in user) or `AdminUser`
//! (role `admin`) as an extractor argument.

pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::user::{ProfileRow, UserRow};

pub use extractors::{AdminUser, AuthUser};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Access token required")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("Failed to issue token: {0}")]
    Issue(#[source] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => AppError::Unauthorized(err.to_string()),
            AuthError::InvalidToken(_) => AppError::Forbidden(err.to_string()),
            AuthError::Issue(_) | AuthError::Hash(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

pub async fn find_user(db: &SqlitePool, user_id: i64) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await
}

pub async fn find_user_by_email(db: &SqlitePool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(db)
        .await
}

/// The user row, or `NotFound` when the account no longer exists.
pub async fn require_user(db: &SqlitePool, user_id: i64) -> Result<UserRow, AppError> {
    find_user(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn find_profile_row(db: &SqlitePool, user_id: i64) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT weight, height, goal, goal_weight, quiz_completed FROM profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Emails are compared case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
