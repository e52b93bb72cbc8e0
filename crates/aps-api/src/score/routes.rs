use aps_plan::{QUESTIONS_PER_QUIZ, ScoreMap};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::service::{QuizOutcome, record_quiz_result};
use crate::{
    ApiState, auth::AuthUser, error::ApiError, metrics::record_quiz_submission, plan::today,
    validation,
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/scores", get(list_scores))
        .route("/scores/reload", post(reload_scores))
        .route("/scores/{lesson_id}", get(get_score))
        .route("/lessons/{lesson_id}/quiz", post(submit_quiz))
}

#[derive(Debug, Serialize)]
pub struct LessonScore {
    pub lesson_id: String,
    /// `None` when the lesson was never attempted
    pub score: Option<u8>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct QuizSubmission {
    pub score: i32,
    #[serde(default = "default_total")]
    pub total: i32,
    #[validate(range(min = 0, max = 86_400, message = "must be between 0 and 86400 seconds"))]
    #[serde(default)]
    pub time_taken_secs: i32,
}

fn default_total() -> i32 {
    i32::from(QUESTIONS_PER_QUIZ)
}

/// Scores currently held in the session cache
async fn list_scores(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<ScoreMap>, ApiError> {
    let session = state.sessions.acquire(&state.pool, auth_user.user_id).await?;
    Ok(Json(session.scores.scores().clone()))
}

async fn get_score(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(lesson_id): Path<String>,
) -> Result<Json<LessonScore>, ApiError> {
    validation::validate_lesson_id(&state.curriculum, &lesson_id)?;

    let session = state.sessions.acquire(&state.pool, auth_user.user_id).await?;
    let score = session.scores.get(&lesson_id);

    Ok(Json(LessonScore { lesson_id, score }))
}

/// Re-read all scores from the store, replacing the cache
async fn reload_scores(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<ScoreMap>, ApiError> {
    let mut session = state.sessions.acquire(&state.pool, auth_user.user_id).await?;
    session.scores.load(&state.pool, auth_user.user_id).await?;

    Ok(Json(session.scores.scores().clone()))
}

async fn submit_quiz(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(lesson_id): Path<String>,
    Json(payload): Json<QuizSubmission>,
) -> Result<Json<QuizOutcome>, ApiError> {
    validation::validate_lesson_id(&state.curriculum, &lesson_id)?;
    payload
        .validate()
        .map_err(|e| ApiError::Validation(validation::validation_message(&e)))?;
    let score = validation::validate_quiz_score(payload.score, payload.total)?;

    let mut session = state.sessions.acquire(&state.pool, auth_user.user_id).await?;

    let outcome = record_quiz_result(
        &state.pool,
        auth_user.user_id,
        &lesson_id,
        score,
        payload.time_taken_secs,
        today(),
    )
    .await?;

    // Only after the store accepted it
    session.scores.update(&lesson_id, score);
    record_quiz_submission(outcome.completed);

    Ok(Json(outcome))
}
