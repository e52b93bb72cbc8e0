use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{QuizAttempt, ScoreRecord};

pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<ScoreRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT lesson_id, score, total, time_taken_secs, recorded_at
            FROM lesson_scores
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Record the latest score for a lesson, replacing any previous one.
pub async fn upsert_score<'e, E>(
    executor: E,
    user_id: Uuid,
    lesson_id: &str,
    score: i16,
    total: i16,
    time_taken_secs: i32,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO lesson_scores (user_id, lesson_id, score, total, time_taken_secs, recorded_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_id, lesson_id)
            DO UPDATE SET
                score = $3,
                total = $4,
                time_taken_secs = $5,
                recorded_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(lesson_id)
    .bind(score)
    .bind(total)
    .bind(time_taken_secs)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_attempt<'e, E>(
    executor: E,
    user_id: Uuid,
    lesson_id: &str,
    score: i16,
    total: i16,
    time_taken_secs: i32,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO quiz_attempts (user_id, lesson_id, score, total, time_taken_secs)
            VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(lesson_id)
    .bind(score)
    .bind(total)
    .bind(time_taken_secs)
    .execute(executor)
    .await?;
    Ok(())
}

/// Most recent quiz attempts, newest first.
pub async fn recent_attempts<'e, E>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<QuizAttempt>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT lesson_id, score, total, time_taken_secs, recorded_at
            FROM quiz_attempts
            WHERE user_id = $1
            ORDER BY recorded_at DESC, id DESC
            LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}
