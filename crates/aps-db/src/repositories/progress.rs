use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{ActivityDay, UserProgress};

pub async fn get_progress<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<UserProgress>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT streak, last_completed_date
            FROM user_progress
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Lock the progress row for the rest of the transaction.
pub async fn get_progress_for_update<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<UserProgress>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT streak, last_completed_date
            FROM user_progress
            WHERE user_id = $1
            FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn set_streak<'e, E>(
    executor: E,
    user_id: Uuid,
    streak: i32,
    last_completed_date: NaiveDate,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO user_progress (user_id, streak, last_completed_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET
                streak = $2,
                last_completed_date = $3,
                updated_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(streak)
    .bind(last_completed_date)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn record_activity<'e, E>(
    executor: E,
    user_id: Uuid,
    activity_date: NaiveDate,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO user_activity (user_id, activity_date, quizzes_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, activity_date)
            DO UPDATE SET quizzes_count = user_activity.quizzes_count + 1
        "#,
    )
    .bind(user_id)
    .bind(activity_date)
    .execute(executor)
    .await?;
    Ok(())
}

/// Activity on or after `since`, oldest first.
pub async fn activity_since<'e, E>(
    executor: E,
    user_id: Uuid,
    since: NaiveDate,
) -> Result<Vec<ActivityDay>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT activity_date, quizzes_count
            FROM user_activity
            WHERE user_id = $1 AND activity_date >= $2
            ORDER BY activity_date
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(executor)
    .await
}
