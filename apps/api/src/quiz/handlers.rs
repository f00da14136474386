use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::quiz::schema::{quiz_schema, StepSchema};
use crate::quiz::summary::{summarize, QuizSummary};
use crate::quiz::{complete_quiz, FormInputs, QuizSession, QuizStep, TOTAL_STEPS};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ValidateStepRequest {
    pub step: u8,
    #[serde(default)]
    pub inputs: FormInputs,
}

#[derive(Serialize)]
pub struct ValidateStepResponse {
    pub valid: bool,
    pub answers: UserProfile,
}

#[derive(Deserialize)]
pub struct CompleteQuizRequest {
    pub steps: Vec<FormInputs>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteQuizResponse {
    pub profile: UserProfile,
    pub summary: QuizSummary,
    pub synced: bool,
    /// The client closes the result screen after this many seconds unless
    /// the user dismisses it first.
    pub auto_close_secs: u64,
}

/// GET /api/quiz/schema
pub async fn handle_get_schema() -> Json<Vec<StepSchema>> {
    Json(quiz_schema())
}

/// POST /api/quiz/validate
pub async fn handle_validate_step(
    _auth: AuthUser,
    Json(req): Json<ValidateStepRequest>,
) -> Result<Json<ValidateStepResponse>, AppError> {
    let step = QuizStep::from_number(req.step).ok_or_else(|| {
        AppError::Validation(format!("Quiz step must be between 1 and {TOTAL_STEPS}"))
    })?;

    let mut session = QuizSession::start();
    session
        .validate_and_collect(step, &req.inputs)
        .map_err(|source| AppError::QuizStep {
            step: req.step,
            source,
        })?;

    Ok(Json(ValidateStepResponse {
        valid: true,
        answers: session.answers().clone(),
    }))
}

/// POST /api/quiz/complete
///
/// Replays every submitted step through a fresh session, so a client can
/// never persist a profile that skipped validation.
pub async fn handle_complete_quiz(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CompleteQuizRequest>,
) -> Result<Json<CompleteQuizResponse>, AppError> {
    if req.steps.len() != TOTAL_STEPS as usize {
        return Err(AppError::Validation(format!(
            "Expected answers for {TOTAL_STEPS} quiz steps, got {}",
            req.steps.len()
        )));
    }

    let mut session = QuizSession::start();
    for inputs in &req.steps {
        let step = session.current_step();
        session
            .advance(inputs)
            .map_err(|source| AppError::QuizStep { step, source })?;
    }

    let profile = session
        .finalize(Utc::now())
        .map_err(|e| AppError::Internal(e.into()))?;

    let synced = complete_quiz(&state.profiles, state.profile_sync.as_ref(), auth.id, &profile).await?;

    Ok(Json(CompleteQuizResponse {
        summary: summarize(&profile),
        profile,
        synced,
        auto_close_secs: state.config.quiz_auto_close_secs,
    }))
}
