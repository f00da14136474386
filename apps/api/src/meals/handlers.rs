use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::meals::streak::meal_streak;
use crate::models::meal::{MealRow, MealType};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub meal_type: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct ListMealsQuery {
    pub filter: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct MealsResponse {
    pub meals: Vec<MealRow>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealStats {
    pub total_meals: i64,
    pub meals_by_type: BTreeMap<String, i64>,
    pub streak: u32,
}

fn parse_meal_type(value: &str) -> Result<MealType, AppError> {
    MealType::parse(value.trim())
        .ok_or_else(|| AppError::Validation(format!("Invalid meal type '{value}'")))
}

/// POST /api/meals
pub async fn handle_create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealRow>), AppError> {
    let name = req.name.trim();
    if name.is_empty() || req.meal_type.trim().is_empty() {
        return Err(AppError::Validation(
            "Meal name and type are required".to_string(),
        ));
    }
    let meal_type = parse_meal_type(&req.meal_type)?;
    let description = req.description.unwrap_or_default();
    let photo_url = req.photo_url.unwrap_or_default();
    let created_at = Utc::now();

    let id = sqlx::query(
        r#"
        INSERT INTO meals (user_id, name, meal_type, description, photo_url, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.id)
    .bind(name)
    .bind(meal_type.as_str())
    .bind(&description)
    .bind(&photo_url)
    .bind(created_at)
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    Ok((
        StatusCode::CREATED,
        Json(MealRow {
            id,
            user_id: auth.id,
            name: name.to_string(),
            meal_type: meal_type.as_str().to_string(),
            description,
            photo_url,
            created_at,
        }),
    ))
}

/// GET /api/meals
///
/// `filter` is a meal type or `all`; `limit` caps the newest-first list.
pub async fn handle_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListMealsQuery>,
) -> Result<Json<MealsResponse>, AppError> {
    let meal_type = match query.filter.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(filter) => Some(parse_meal_type(filter)?),
    };
    let limit = query.limit.map(i64::from).unwrap_or(-1);

    let meals = sqlx::query_as(
        r#"
        SELECT id, user_id, name, meal_type, description, photo_url, created_at
        FROM meals
        WHERE user_id = ? AND (? IS NULL OR meal_type = ?)
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(auth.id)
    .bind(meal_type.map(|m| m.as_str()))
    .bind(meal_type.map(|m| m.as_str()))
    .bind(limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(MealsResponse { meals }))
}

/// DELETE /api/meals/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM meals WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(auth.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Meal {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/meals/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MealStats>, AppError> {
    let by_type: Vec<(String, i64)> = sqlx::query_as(
        "SELECT meal_type, COUNT(*) FROM meals WHERE user_id = ? GROUP BY meal_type",
    )
    .bind(auth.id)
    .fetch_all(&state.db)
    .await?;

    let total_meals: i64 = by_type.iter().map(|(_, count)| count).sum();
    let streak = meal_streak(&state.db, auth.id, Utc::now().date_naive()).await?;

    Ok(Json(MealStats {
        total_meals,
        meals_by_type: by_type.into_iter().collect(),
        streak,
    }))
}
