use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::auth::{find_profile_row, normalize_email, require_user, AuthUser};
use crate::errors::{conflict_on_unique, AppError};
use crate::models::profile::{Goal, UserProfile};
use crate::models::user::PublicUser;
use crate::profile::current_profile;
use crate::quiz::summary::{summarize, QuizSummary};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: Option<UserProfile>,
    pub summary: Option<QuizSummary>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<String>,
    pub goal_weight: Option<f64>,
}

#[derive(Serialize)]
pub struct UpdateProfileResponse {
    pub user: PublicUser,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub password: String,
}

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = current_profile(&state, auth.id).await?;
    let summary = profile
        .as_ref()
        .filter(|p| p.quiz_completed)
        .map(summarize);
    Ok(Json(ProfileResponse { profile, summary }))
}

fn positive(value: Option<f64>, field: &str) -> Result<Option<f64>, AppError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(AppError::Validation(format!(
            "{field} must be a positive number"
        ))),
        other => Ok(other),
    }
}

/// PUT /api/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    let weight = positive(req.weight, "weight")?;
    let height = positive(req.height, "height")?;
    let goal_weight = positive(req.goal_weight, "goalWeight")?;
    let goal = match req.goal.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        Some(key) => Some(
            Goal::from_any_key(key)
                .ok_or_else(|| AppError::Validation(format!("Unknown goal '{key}'")))?,
        ),
        None => None,
    };
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let email = req
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty());

    if let Some(email) = &email {
        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ? AND id != ?")
            .bind(email)
            .bind(auth.id)
            .fetch_optional(&state.db)
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }
    }

    let now = Utc::now();
    if name.is_some() || email.is_some() {
        sqlx::query(
            "UPDATE users SET name = COALESCE(?, name), email = COALESCE(?, email), updated_at = ? WHERE id = ?",
        )
        .bind(name)
        .bind(email.as_deref())
        .bind(now)
        .bind(auth.id)
        .execute(&state.db)
        .await
        .map_err(|e| conflict_on_unique(e, "Email already in use"))?;
    }

    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, weight, height, goal, goal_weight, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id) DO UPDATE SET
            weight = COALESCE(excluded.weight, profiles.weight),
            height = COALESCE(excluded.height, profiles.height),
            goal = COALESCE(excluded.goal, profiles.goal),
            goal_weight = COALESCE(excluded.goal_weight, profiles.goal_weight),
            updated_at = excluded.updated_at
        "#,
    )
    .bind(auth.id)
    .bind(weight)
    .bind(height)
    .bind(goal.map(|g| g.key()))
    .bind(goal_weight)
    .bind(now)
    .execute(&state.db)
    .await?;

    // Keep the stored quiz profile in step with the form edits.
    if let Some(mut stored) = state.profiles.load(auth.id).await? {
        if weight.is_some() {
            stored.weight = weight;
        }
        if let Some(height) = height {
            stored.height = Some(height.trunc() as u32);
        }
        if goal.is_some() {
            stored.goal = goal;
        }
        if goal_weight.is_some() {
            stored.goal_weight = goal_weight;
        }
        stored.refresh_bmi();
        state.profiles.save(auth.id, &stored).await?;
    }

    let user = require_user(&state.db, auth.id).await?;
    let profile = find_profile_row(&state.db, auth.id).await?;
    Ok(Json(UpdateProfileResponse {
        user: user.into_public(profile),
    }))
}

/// PUT /api/profile/password
pub async fn handle_change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(AppError::Validation(
            "Current and new password are required".to_string(),
        ));
    }
    if req.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "New password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let user = require_user(&state.db, auth.id).await?;
    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = hash_password(&req.new_password)?;
    sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(Utc::now())
        .bind(auth.id)
        .execute(&state.db)
        .await?;

    Ok(Json(json!({ "changed": true })))
}

/// DELETE /api/profile
pub async fn handle_delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<DeleteAccountRequest>,
) -> Result<Json<Value>, AppError> {
    if req.password.is_empty() {
        return Err(AppError::Validation(
            "Password is required to delete the account".to_string(),
        ));
    }

    let user = require_user(&state.db, auth.id).await?;
    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Unauthorized("Incorrect password".to_string()));
    }

    // Meals, recipes, progress and the profile row cascade.
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(auth.id)
        .execute(&state.db)
        .await?;
    state.profiles.remove(auth.id).await?;

    info!("Deleted account {}", auth.id);
    Ok(Json(json!({ "deleted": true })))
}
