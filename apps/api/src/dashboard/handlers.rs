use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::auth::{require_user, AuthUser};
use crate::dashboard::{daily_tip, days_in_protocol};
use crate::errors::AppError;
use crate::meals::streak::meal_streak;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub name: String,
    pub days_in_protocol: i64,
    pub total_meals: i64,
    pub saved_recipes: i64,
    pub streak: u32,
    pub daily_tip: &'static str,
}

/// GET /api/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = require_user(&state.db, auth.id).await?;
    let today = Utc::now().date_naive();

    let total_meals: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meals WHERE user_id = ?")
        .bind(auth.id)
        .fetch_one(&state.db)
        .await?;
    let saved_recipes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE user_id = ?")
        .bind(auth.id)
        .fetch_one(&state.db)
        .await?;
    let streak = meal_streak(&state.db, auth.id, today).await?;

    Ok(Json(DashboardResponse {
        days_in_protocol: days_in_protocol(user.created_at.date_naive(), today),
        name: user.name,
        total_meals,
        saved_recipes,
        streak,
        daily_tip: daily_tip(today),
    }))
}
