use aps_plan::progress::{UnitStatus, curriculum_status};
use axum::{Json, Router, extract::State, routing::get};

use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/curriculum", get(get_curriculum))
}

/// Units and lessons with the user's scores, locks and progress
async fn get_curriculum(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<UnitStatus>>, ApiError> {
    let session = state.sessions.acquire(&state.pool, auth_user.user_id).await?;

    Ok(Json(curriculum_status(
        &state.curriculum,
        session.scores.scores(),
    )))
}
