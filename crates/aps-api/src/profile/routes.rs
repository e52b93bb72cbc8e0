use aps_db::{
    models::{ActivityDay, QuizAttempt},
    repositories::{account, progress, score},
};
use aps_plan::{progress::completed_lessons, streak::displayed_streak};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};
use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::{ApiState, auth::AuthUser, error::ApiError, plan::today};

const RECENT_ATTEMPTS: i64 = 5;
const ACTIVITY_DAYS: u64 = 7;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/me", delete(delete_account_data))
        .route("/me/progress", get(get_progress))
}

#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    /// Zero once a full day passed without a quiz
    pub streak: i32,
    pub last_completed_date: Option<NaiveDate>,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub recent_attempts: Vec<QuizAttempt>,
    /// Quizzes per day over the last week, oldest first
    pub activity: Vec<ActivityDay>,
}

async fn get_progress(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<ProgressSummary>, ApiError> {
    let user_id = auth_user.user_id;
    let today = today();

    let session = state.sessions.acquire(&state.pool, user_id).await?;
    let completed: usize = state
        .curriculum
        .units
        .iter()
        .map(|unit| completed_lessons(unit, session.scores.scores()))
        .sum();
    drop(session);

    let stored = progress::get_progress(&state.pool, user_id)
        .await?
        .unwrap_or_default();
    let recent_attempts = score::recent_attempts(&state.pool, user_id, RECENT_ATTEMPTS).await?;
    let since = today
        .checked_sub_days(Days::new(ACTIVITY_DAYS - 1))
        .unwrap_or(today);
    let activity = progress::activity_since(&state.pool, user_id, since).await?;

    Ok(Json(ProgressSummary {
        streak: displayed_streak(stored.last_completed_date, stored.streak, today),
        last_completed_date: stored.last_completed_date,
        completed_lessons: completed,
        total_lessons: state.curriculum.lesson_count(),
        recent_attempts,
        activity,
    }))
}

/// Remove everything stored for the user and end their session
async fn delete_account_data(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    // Held across the delete so no queued request writes rows afterwards
    let session = state.sessions.lock_existing(auth_user.user_id).await;

    account::delete_user_data(&state.pool, auth_user.user_id).await?;
    if let Some(session) = session {
        state.sessions.end(session).await;
    }

    tracing::info!(user_id = %auth_user.user_id, "User study data deleted");

    Ok(StatusCode::NO_CONTENT)
}
