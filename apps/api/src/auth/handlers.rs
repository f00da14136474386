use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::jwt::issue_token;
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::auth::{find_profile_row, find_user_by_email, normalize_email, require_user, AuthUser};
use crate::errors::{conflict_on_unique, AppError};
use crate::models::user::{PublicUser, ROLE_ADMIN, ROLE_USER};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let name = req.name.trim();
    let email = normalize_email(&req.email);
    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Name, email and password are required".to_string(),
        ));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if find_user_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let is_admin = state
        .config
        .admin_email
        .as_deref()
        .is_some_and(|admin| normalize_email(admin) == email);
    let role = if is_admin { ROLE_ADMIN } else { ROLE_USER };
    let now = Utc::now();

    let mut tx = state.db.begin().await?;
    let user_id = sqlx::query(
        "INSERT INTO users (name, email, password_hash, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Email already registered"))?
    .last_insert_rowid();

    sqlx::query("INSERT INTO profiles (user_id, updated_at) VALUES (?, ?)")
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("Registered user {user_id} (role: {role})");

    let token = issue_token(user_id, &state.config.jwt_secret)?;
    let user = require_user(&state.db, user_id).await?;
    let profile = find_profile_row(&state.db, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into_public(profile),
        }),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
    let user = find_user_by_email(&state.db, &email)
        .await?
        .ok_or_else(invalid)?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid());
    }

    let token = issue_token(user.id, &state.config.jwt_secret)?;
    let profile = find_profile_row(&state.db, user.id).await?;
    Ok(Json(AuthResponse {
        token,
        user: user.into_public(profile),
    }))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = require_user(&state.db, auth.id).await?;
    let profile = find_profile_row(&state.db, auth.id).await?.unwrap_or_default();
    Ok(Json(MeResponse {
        user: user.into_public(Some(profile)),
    }))
}
