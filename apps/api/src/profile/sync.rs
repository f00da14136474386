use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::profile::{Goal, UserProfile};
use crate::models::user::ProfileRow;

#[derive(Debug, Error)]
pub enum RemoteSyncError {
    #[error("profile row update failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// The subset of a profile mirrored onto the server `profiles` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub weight: Option<f64>,
    pub height: Option<u32>,
    pub goal: Option<Goal>,
    pub goal_weight: Option<f64>,
    pub quiz_completed: bool,
}

impl From<&UserProfile> for ProfileUpdate {
    fn from(profile: &UserProfile) -> Self {
        ProfileUpdate {
            weight: profile.weight,
            height: profile.height,
            goal: profile.goal,
            goal_weight: profile.goal_weight,
            quiz_completed: profile.quiz_completed,
        }
    }
}

/// Pushes completed-quiz data to the server profile. Failures are reported,
/// and callers treat them as non-fatal.
#[async_trait]
pub trait ProfileSync: Send + Sync {
    async fn push(&self, user_id: i64, update: &ProfileUpdate) -> Result<(), RemoteSyncError>;
}

pub struct SqlProfileSync {
    pool: SqlitePool,
}

impl SqlProfileSync {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileSync for SqlProfileSync {
    async fn push(&self, user_id: i64, update: &ProfileUpdate) -> Result<(), RemoteSyncError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, weight, height, goal, goal_weight, quiz_completed, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                weight = COALESCE(excluded.weight, profiles.weight),
                height = COALESCE(excluded.height, profiles.height),
                goal = COALESCE(excluded.goal, profiles.goal),
                goal_weight = COALESCE(excluded.goal_weight, profiles.goal_weight),
                quiz_completed = excluded.quiz_completed,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(update.weight)
        .bind(update.height.map(f64::from))
        .bind(update.goal.map(|g| g.key()))
        .bind(update.goal_weight)
        .bind(update.quiz_completed)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Reads the server profile row and lifts it into a partial `UserProfile`.
pub async fn load_remote(pool: &SqlitePool, user_id: i64) -> Result<Option<UserProfile>, sqlx::Error> {
    let row: Option<ProfileRow> = sqlx::query_as(
        "SELECT weight, height, goal, goal_weight, quiz_completed FROM profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| remote_profile(&row)))
}

fn remote_profile(row: &ProfileRow) -> UserProfile {
    let mut profile = UserProfile {
        weight: row.weight.filter(|w| *w > 0.0),
        height: row.height.filter(|h| *h >= 1.0).map(|h| h.trunc() as u32),
        goal: row.goal.as_deref().and_then(Goal::from_any_key),
        goal_weight: row.goal_weight.filter(|w| *w > 0.0),
        quiz_completed: row.quiz_completed,
        ..Default::default()
    };
    profile.refresh_bmi();
    profile
}
