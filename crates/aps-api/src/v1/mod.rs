use axum::Router;

use crate::{curriculum, plan, profile, score, session, state::ApiState};

/// V1 API routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .merge(session::routes())
        .merge(plan::routes())
        .merge(score::routes())
        .merge(curriculum::routes())
        .merge(profile::routes())
}
