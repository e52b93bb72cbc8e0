use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::StudyRange;

pub async fn get_range<'e, E>(executor: E, user_id: Uuid) -> Result<Option<StudyRange>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT start_date, end_date
            FROM study_ranges
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn set_range<'e, E>(
    executor: E,
    user_id: Uuid,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO study_ranges (user_id, start_date, end_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET
                start_date = $2,
                end_date = $3,
                updated_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(start_date)
    .bind(end_date)
    .execute(executor)
    .await?;
    Ok(())
}
