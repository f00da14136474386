//! Durable per-user profile storage.
//!
//! `ProfileStore` keeps the canonical quiz profile as one JSON document per
//! user behind the `KeyValueStore` trait. `AppState` holds the SQLite-backed
//! implementation; tests swap in `MemoryKv`.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::warn;

use crate::models::profile::UserProfile;

// ────────────────────────────────────────────────────────────────────────────
// Key-value backends
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Stores documents in the `kv_store` table.
#[derive(Clone)]
pub struct SqliteKv {
    pool: SqlitePool,
}

impl SqliteKv {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKv {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        raw.map(|text| {
            serde_json::from_str(&text).with_context(|| format!("kv_store value for '{key}' is not JSON"))
        })
        .transpose()
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-process map. Contents are lost on restart.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryKv {
    entries: Arc<tokio::sync::RwLock<std::collections::HashMap<String, Value>>>,
}

#[cfg(test)]
#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profile store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ProfileStore {
    kv: Arc<dyn KeyValueStore>,
}

fn profile_key(user_id: i64) -> String {
    format!("user_profile:{user_id}")
}

impl ProfileStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// The stored profile, or `None` when nothing was saved yet.
    ///
    /// A document that no longer deserializes is treated as absent so a
    /// schema change never locks a user out of the quiz.
    pub async fn load(&self, user_id: i64) -> Result<Option<UserProfile>> {
        let Some(value) = self.kv.get(&profile_key(user_id)).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!("Discarding unreadable profile for user {user_id}: {e}");
                Ok(None)
            }
        }
    }

    /// Overwrites the whole profile. Last write wins.
    pub async fn save(&self, user_id: i64, profile: &UserProfile) -> Result<()> {
        let value = serde_json::to_value(profile)?;
        self.kv.set(&profile_key(user_id), value).await
    }

    pub async fn remove(&self, user_id: i64) -> Result<()> {
        self.kv.remove(&profile_key(user_id)).await
    }
}

/// Picks the profile to show when both the server `profiles` row and the
/// stored quiz profile may exist.
///
/// A quiz-complete server profile wins; the fields it does not carry are
/// filled from the stored one. Otherwise the stored profile is used, and the
/// server profile only when nothing was stored.
pub fn resolve_profile(
    remote: Option<UserProfile>,
    local: Option<UserProfile>,
) -> Option<UserProfile> {
    match (remote, local) {
        (Some(remote), Some(local)) if remote.quiz_completed => Some(fill_missing(remote, local)),
        (_, Some(local)) => Some(local),
        (remote, None) => remote,
    }
}

fn fill_missing(primary: UserProfile, fallback: UserProfile) -> UserProfile {
    fn first_non_empty<T>(a: Vec<T>, b: Vec<T>) -> Vec<T> {
        if a.is_empty() {
            b
        } else {
            a
        }
    }

    let mut merged = UserProfile {
        goal: primary.goal.or(fallback.goal),
        age: primary.age.or(fallback.age),
        gender: primary.gender.or(fallback.gender),
        weight: primary.weight.or(fallback.weight),
        height: primary.height.or(fallback.height),
        goal_weight: primary.goal_weight.or(fallback.goal_weight),
        bmi: None,
        activity_level: primary.activity_level.or(fallback.activity_level),
        stress_level: primary.stress_level.or(fallback.stress_level),
        sleep_quality: primary.sleep_quality.or(fallback.sleep_quality),
        hydration: primary.hydration.or(fallback.hydration),
        current_habits: first_non_empty(primary.current_habits, fallback.current_habits),
        favorite_proteins: first_non_empty(primary.favorite_proteins, fallback.favorite_proteins),
        restrictions: first_non_empty(primary.restrictions, fallback.restrictions),
        routine: primary.routine.or(fallback.routine),
        quiz_completed: primary.quiz_completed || fallback.quiz_completed,
        completed_at: primary.completed_at.or(fallback.completed_at),
    };
    merged.refresh_bmi();
    merged
}
