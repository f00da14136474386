// Per-user profile: canonical quiz profile storage, the server profile row
// mirror, and the account/profile routes.

pub mod handlers;
pub mod store;
pub mod sync;

use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::state::AppState;

/// The profile to act on for `user_id`, after applying the precedence rule
/// between the server row and the stored quiz profile.
pub async fn current_profile(state: &AppState, user_id: i64) -> Result<Option<UserProfile>, AppError> {
    let remote = sync::load_remote(&state.db, user_id).await?;
    let local = state.profiles.load(user_id).await?;
    Ok(store::resolve_profile(remote, local))
}
