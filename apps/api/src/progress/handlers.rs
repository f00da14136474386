use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::progress::WeightEntry;
use crate::profile::current_profile;
use crate::progress::aggregator::{chart_points, history, summarize, ChartPoint, HistoryItem, Summary};
use crate::progress::chart::{render_svg, ChartSize, DEFAULT_HEIGHT, DEFAULT_PADDING, DEFAULT_WIDTH};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateEntryRequest {
    pub weight: Option<f64>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct ChartQuery {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ChartQuery {
    fn size(&self) -> Result<ChartSize, AppError> {
        let size = ChartSize {
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            padding: DEFAULT_PADDING,
        };
        let min = size.padding * 2.0;
        if !(size.width.is_finite() && size.width > min && size.height.is_finite() && size.height > min) {
            return Err(AppError::Validation(format!(
                "Chart width and height must be greater than {min}"
            )));
        }
        Ok(size)
    }
}

#[derive(Serialize)]
pub struct EntriesResponse {
    pub progress: Vec<WeightEntry>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryItem>,
}

#[derive(Serialize)]
pub struct ChartResponse {
    /// `None` until at least two weigh-ins exist.
    pub points: Option<Vec<ChartPoint>>,
}

/// All of a user's entries, oldest first, same-day entries in insertion order.
async fn fetch_entries(db: &SqlitePool, user_id: i64) -> Result<Vec<WeightEntry>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, weight, date, notes, created_at
        FROM progress
        WHERE user_id = ?
        ORDER BY date ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// POST /api/progress
pub async fn handle_create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<WeightEntry>), AppError> {
    let weight = match req.weight {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => {
            return Err(AppError::Validation(
                "Weight must be a positive number".to_string(),
            ))
        }
    };
    let date = req
        .date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::Validation("Date is required".to_string()))?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{date}', expected YYYY-MM-DD")))?;
    let notes = req.notes.unwrap_or_default();
    let now = Utc::now();

    let id = sqlx::query(
        "INSERT INTO progress (user_id, weight, date, notes, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(auth.id)
    .bind(weight)
    .bind(date)
    .bind(&notes)
    .bind(now)
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    // A backdated entry leaves the current weight alone; same-day entries
    // order by id, so the new one counts as latest.
    let has_later: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM progress WHERE user_id = ? AND id != ? AND date > ?)",
    )
    .bind(auth.id)
    .bind(id)
    .bind(date)
    .fetch_one(&state.db)
    .await?;

    if !has_later {
        update_current_weight(&state, auth.id, weight).await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(WeightEntry {
            id,
            weight,
            date,
            notes,
            created_at: now,
        }),
    ))
}

/// Makes `weight` the profile weight, in the profile row and in the stored
/// quiz profile when one exists.
async fn update_current_weight(state: &AppState, user_id: i64, weight: f64) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, weight, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT (user_id) DO UPDATE SET
            weight = excluded.weight,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(weight)
    .bind(Utc::now())
    .execute(&state.db)
    .await?;

    if let Some(mut stored) = state.profiles.load(user_id).await? {
        stored.weight = Some(weight);
        stored.refresh_bmi();
        state.profiles.save(user_id, &stored).await?;
    }
    Ok(())
}

/// GET /api/progress
pub async fn handle_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> Result<Json<EntriesResponse>, AppError> {
    // SQLite reads a negative LIMIT as "no limit".
    let limit = query.limit.map(i64::from).unwrap_or(-1);
    let progress = sqlx::query_as(
        r#"
        SELECT id, weight, date, notes, created_at
        FROM progress
        WHERE user_id = ?
        ORDER BY date DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(auth.id)
    .bind(limit)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(EntriesResponse { progress }))
}

/// GET /api/progress/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Summary>, AppError> {
    let entries = fetch_entries(&state.db, auth.id).await?;
    let profile = current_profile(&state, auth.id).await?;
    let fallback_weight = profile.as_ref().and_then(|p| p.weight);
    let goal_weight = profile.as_ref().and_then(|p| p.goal_weight);
    Ok(Json(summarize(&entries, fallback_weight, goal_weight)))
}

/// GET /api/progress/history
pub async fn handle_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let entries = fetch_entries(&state.db, auth.id).await?;
    // Changes are computed over the full series before truncating.
    let mut history = history(&entries);
    if let Some(limit) = query.limit {
        history.truncate(limit as usize);
    }
    Ok(Json(HistoryResponse { history }))
}

/// GET /api/progress/chart
pub async fn handle_chart(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, AppError> {
    let size = query.size()?;
    let entries = fetch_entries(&state.db, auth.id).await?;
    let points = chart_points(&entries, size.width, size.height, size.padding).ok();
    Ok(Json(ChartResponse { points }))
}

/// GET /api/progress/chart.svg
pub async fn handle_chart_svg(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, AppError> {
    let size = query.size()?;
    let entries = fetch_entries(&state.db, auth.id).await?;
    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_svg(&entries, size),
    ))
}

/// DELETE /api/progress/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM progress WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(auth.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Progress entry {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
