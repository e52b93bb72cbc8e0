use aps_db::repositories::{progress, score};
use aps_plan::{COMPLETED_SCORE, QUESTIONS_PER_QUIZ, streak::next_streak};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOutcome {
    pub lesson_id: String,
    pub score: u8,
    pub total: u8,
    pub completed: bool,
    pub streak: i32,
}

/// Persist a quiz result together with its history and streak updates
///
/// Everything happens in one transaction: the latest score, the attempt log,
/// the daily activity counter and the streak either all change or none do.
pub async fn record_quiz_result(
    pool: &PgPool,
    user_id: Uuid,
    lesson_id: &str,
    score: u8,
    time_taken_secs: i32,
    today: NaiveDate,
) -> Result<QuizOutcome, ApiError> {
    let mut tx = pool.begin().await?;

    let stored_score = i16::from(score);
    let total = i16::from(QUESTIONS_PER_QUIZ);

    score::upsert_score(&mut *tx, user_id, lesson_id, stored_score, total, time_taken_secs).await?;
    score::insert_attempt(&mut *tx, user_id, lesson_id, stored_score, total, time_taken_secs)
        .await?;
    progress::record_activity(&mut *tx, user_id, today).await?;

    let current = progress::get_progress_for_update(&mut *tx, user_id)
        .await?
        .unwrap_or_default();
    let streak = next_streak(current.last_completed_date, current.streak, today);
    progress::set_streak(&mut *tx, user_id, streak, today).await?;

    tx.commit().await?;

    let completed = score == COMPLETED_SCORE;
    tracing::info!(%user_id, lesson_id, score, completed, streak, "Quiz result recorded");

    Ok(QuizOutcome {
        lesson_id: lesson_id.to_string(),
        score,
        total: QUESTIONS_PER_QUIZ,
        completed,
        streak,
    })
}
