use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use crate::auth::AdminUser;
use crate::errors::AppError;
use crate::models::user::{ROLE_ADMIN, ROLE_USER};
use crate::state::AppState;

/// One row of the admin user listing: account fields joined with the profile row.
#[derive(Debug, FromRow)]
struct UserListingRow {
    id: i64,
    name: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
    weight: Option<f64>,
    height: Option<f64>,
    goal: Option<String>,
    quiz_completed: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserProfile {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<String>,
    pub quiz_completed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub profile: AdminUserProfile,
}

impl From<UserListingRow> for AdminUserView {
    fn from(row: UserListingRow) -> Self {
        AdminUserView {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
            profile: AdminUserProfile {
                weight: row.weight,
                height: row.height,
                goal: row.goal,
                quiz_completed: row.quiz_completed.unwrap_or(false),
            },
        }
    }
}

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<AdminUserView>,
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub total_meals: i64,
    pub total_recipes: i64,
    pub new_users_today: i64,
}

/// GET /api/admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<UsersResponse>, AppError> {
    let rows: Vec<UserListingRow> = sqlx::query_as(
        r#"
        SELECT u.id, u.name, u.email, u.role, u.created_at,
               p.weight, p.height, p.goal, p.quiz_completed
        FROM users u
        LEFT JOIN profiles p ON u.id = p.user_id
        ORDER BY u.created_at DESC, u.id DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(UsersResponse {
        users: rows.into_iter().map(AdminUserView::from).collect(),
    }))
}

/// DELETE /api/admin/users/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if id == admin.id {
        return Err(AppError::Validation(
            "Administrators cannot delete their own account".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {id} not found")));
    }
    state.profiles.remove(id).await?;

    info!("Admin {} deleted user {id}", admin.id);
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/admin/users/:id/role
pub async fn handle_update_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let role = req.role.trim();
    if role != ROLE_USER && role != ROLE_ADMIN {
        return Err(AppError::Validation(format!(
            "Invalid role '{role}', expected '{ROLE_USER}' or '{ROLE_ADMIN}'"
        )));
    }

    let result = sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role)
        .bind(Utc::now())
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {id} not found")));
    }

    info!("Admin {} set role of user {id} to {role}", admin.id);
    Ok(Json(serde_json::json!({ "id": id, "role": role })))
}

async fn count(db: &SqlitePool, sql: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(sql).fetch_one(db).await
}

/// GET /api/admin/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<AdminStats>, AppError> {
    let total_users = count(&state.db, "SELECT COUNT(*) FROM users").await?;
    let total_meals = count(&state.db, "SELECT COUNT(*) FROM meals").await?;
    let total_recipes = count(&state.db, "SELECT COUNT(*) FROM recipes").await?;
    let new_users_today: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE date(created_at) = ?")
            .bind(Utc::now().date_naive())
            .fetch_one(&state.db)
            .await?;

    Ok(Json(AdminStats {
        total_users,
        total_meals,
        total_recipes,
        new_users_today,
    }))
}
