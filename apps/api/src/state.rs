use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::profile::store::{ProfileStore, SqliteKv};
use crate::profile::sync::{ProfileSync, SqlProfileSync};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// `None` when no OpenAI key is configured; recipe generation then uses the static table.
    pub llm: Option<LlmClient>,
    pub config: Config,
    /// Canonical quiz profiles, one document per user.
    pub profiles: ProfileStore,
    /// Mirrors completed quiz profiles into the `profiles` table.
    pub profile_sync: Arc<dyn ProfileSync>,
}

impl AppState {
    /// Wires the SQLite-backed profile store and sync onto `db`.
    pub fn new(db: SqlitePool, llm: Option<LlmClient>, config: Config) -> Self {
        Self {
            profiles: ProfileStore::new(Arc::new(SqliteKv::new(db.clone()))),
            profile_sync: Arc::new(SqlProfileSync::new(db.clone())),
            db,
            llm,
            config,
        }
    }
}
