// Onboarding quiz: step validation, the session state machine, the result
// summary and persistence of the finished profile.

pub mod engine;
pub mod handlers;
pub mod schema;
pub mod summary;

use anyhow::Result;
use tracing::{info, warn};

use crate::models::profile::UserProfile;
use crate::profile::store::ProfileStore;
use crate::profile::sync::{ProfileSync, ProfileUpdate};

pub use engine::{FormInputs, QuizSession, QuizStep, ValidationError, TOTAL_STEPS};

/// Persists a finalized profile and mirrors it to the server profile row.
///
/// The store write is authoritative and its failure is returned. The sync is
/// best-effort: a failure is logged and reported as `Ok(false)`.
pub async fn complete_quiz(
    store: &ProfileStore,
    sync: &dyn ProfileSync,
    user_id: i64,
    profile: &UserProfile,
) -> Result<bool> {
    store.save(user_id, profile).await?;
    info!("Saved quiz profile for user {user_id}");

    match sync.push(user_id, &ProfileUpdate::from(profile)).await {
        Ok(()) => Ok(true),
        Err(e) => {
            warn!("Profile sync failed for user {user_id}, keeping local profile: {e}");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Goal;
    use crate::profile::store::MemoryKv;
    use crate::profile::sync::RemoteSyncError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSync {
        pushed: Mutex<Vec<(i64, ProfileUpdate)>>,
    }

    #[async_trait]
    impl ProfileSync for RecordingSync {
        async fn push(&self, user_id: i64, update: &ProfileUpdate) -> Result<(), RemoteSyncError> {
            self.pushed.lock().unwrap().push((user_id, update.clone()));
            Ok(())
        }
    }

    struct FailingSync;

    #[async_trait]
    impl ProfileSync for FailingSync {
        async fn push(&self, _: i64, _: &ProfileUpdate) -> Result<(), RemoteSyncError> {
            Err(RemoteSyncError::Database(sqlx::Error::PoolClosed))
        }
    }

    fn finished_profile() -> UserProfile {
        let mut session = QuizSession::start();
        for inputs in engine::tests::valid_answers() {
            session.advance(&inputs).unwrap();
        }
        session.finalize(chrono::Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_complete_quiz_saves_and_syncs() {
        let store = ProfileStore::new(Arc::new(MemoryKv::default()));
        let sync = RecordingSync::default();
        let profile = finished_profile();

        let synced = complete_quiz(&store, &sync, 5, &profile).await.unwrap();
        assert!(synced);
        assert_eq!(store.load(5).await.unwrap(), Some(profile.clone()));

        let pushed = sync.pushed.lock().unwrap();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].0, 5);
        assert_eq!(pushed[0].1.goal, Some(Goal::LoseWeight));
        assert_eq!(pushed[0].1.weight, Some(80.0));
        assert!(pushed[0].1.quiz_completed);
    }

    #[tokio::test]
    async fn test_sync_failure_keeps_local_profile() {
        let store = ProfileStore::new(Arc::new(MemoryKv::default()));
        let profile = finished_profile();

        let synced = complete_quiz(&store, &FailingSync, 9, &profile).await.unwrap();
        assert!(!synced);
        let stored = store.load(9).await.unwrap().unwrap();
        assert!(stored.quiz_completed);
    }
}
