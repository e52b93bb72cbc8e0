use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/session", post(start_session).delete(end_session))
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Lessons with a stored score
    pub scores_loaded: usize,
}

/// Sign in: start a fresh session and load the user's scores
async fn start_session(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<(StatusCode, Json<SessionInfo>), ApiError> {
    let shared = state.sessions.sign_in(&state.pool, auth_user.user_id).await?;
    let session = shared.lock().await;

    Ok((
        StatusCode::CREATED,
        Json(SessionInfo {
            user_id: session.user_id,
            started_at: session.started_at,
            scores_loaded: session.scores.scores().len(),
        }),
    ))
}

/// Sign out: drop the session and everything cached in it
async fn end_session(auth_user: AuthUser, State(state): State<ApiState>) -> StatusCode {
    state.sessions.sign_out(auth_user.user_id).await;
    StatusCode::NO_CONTENT
}
