use aps_db::repositories::range;
use aps_plan::{
    CalendarIndex, DateRange,
    progress::{NextLesson, next_lesson},
};
use axum::{Json, Router, extract::State, routing::get};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::service::{PlanOutcome, PlanStatus, build_or_load, today};
use crate::{
    ApiState, auth::AuthUser, error::ApiError, session::StudySession, validation,
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/plan", get(get_plan))
        .route("/plan/cached", get(get_cached_plan))
        .route("/plan/next", get(get_next_lesson))
        .route("/plan/range", get(get_date_range).put(put_date_range))
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    /// `None` when no build-or-load ran in this session yet
    pub status: Option<PlanStatus>,
    pub today: NaiveDate,
    pub rolled_over: usize,
    pub calendar: CalendarIndex,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Run build-or-load and replace the session's index with the result
async fn refresh_plan(
    state: &ApiState,
    session: &mut StudySession,
    today: NaiveDate,
) -> Result<PlanOutcome, ApiError> {
    let outcome = build_or_load(
        &state.pool,
        &state.curriculum,
        session.user_id,
        session.scores.scores(),
        today,
    )
    .await?;

    session.calendar = outcome.index.clone();
    session.plan_status = Some(outcome.status);
    session.rolled_over = outcome.rolled_over;

    Ok(outcome)
}

async fn get_plan(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<PlanResponse>, ApiError> {
    let mut session = state.sessions.acquire(&state.pool, auth_user.user_id).await?;
    let today = today();

    let outcome = refresh_plan(&state, &mut session, today).await?;

    Ok(Json(PlanResponse {
        status: Some(outcome.status),
        today,
        rolled_over: outcome.rolled_over,
        calendar: outcome.index,
    }))
}

/// Index from the last build-or-load, without touching the store
async fn get_cached_plan(auth_user: AuthUser, State(state): State<ApiState>) -> Json<PlanResponse> {
    let today = today();

    let Some(mut session) = state.sessions.lock_existing(auth_user.user_id).await else {
        return Json(PlanResponse {
            status: None,
            today,
            rolled_over: 0,
            calendar: CalendarIndex::new(),
        });
    };
    session.touch();

    Json(PlanResponse {
        status: session.plan_status,
        today,
        rolled_over: session.rolled_over,
        calendar: session.calendar.clone(),
    })
}

async fn get_next_lesson(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Option<NextLesson>>, ApiError> {
    let mut session = state.sessions.acquire(&state.pool, auth_user.user_id).await?;
    let today = today();

    refresh_plan(&state, &mut session, today).await?;

    let next = next_lesson(
        &state.curriculum,
        &session.calendar,
        session.scores.scores(),
        today,
    );

    Ok(Json(next))
}

async fn get_date_range(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<DateRange>, ApiError> {
    let date_range = range::get_range(&state.pool, auth_user.user_id)
        .await?
        .map(DateRange::from)
        .unwrap_or_default();

    Ok(Json(date_range))
}

/// Store the onboarding date range
///
/// Only affects plan construction; an already stored plan is kept.
async fn put_date_range(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<DateRangeRequest>,
) -> Result<Json<DateRange>, ApiError> {
    validation::validate_date_range(payload.start_date, payload.end_date)?;

    range::set_range(
        &state.pool,
        auth_user.user_id,
        payload.start_date,
        payload.end_date,
    )
    .await?;

    tracing::info!(
        user_id = %auth_user.user_id,
        start = ?payload.start_date,
        end = ?payload.end_date,
        "Study date range saved"
    );

    Ok(Json(DateRange {
        start: payload.start_date,
        end: payload.end_date,
    }))
}
