use aps_plan::CalendarEntry;
use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::CalendarEntryRow;

/// All calendar entries of a user, by date then by planned position.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<CalendarEntryRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT lesson_id, scheduled_date
            FROM calendar_entries
            WHERE user_id = $1
            ORDER BY scheduled_date, position
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Persist a freshly built plan in a single statement.
///
/// Lessons that already have a date keep it. Returns the number of entries
/// actually written.
pub async fn insert_plan<'e, E>(
    executor: E,
    user_id: Uuid,
    entries: &[CalendarEntry],
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let lesson_ids: Vec<String> = entries.iter().map(|e| e.lesson_id.clone()).collect();
    let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    let positions: Vec<i32> = (0..entries.len())
        .map(|i| i32::try_from(i).unwrap_or(i32::MAX))
        .collect();

    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO calendar_entries (user_id, lesson_id, scheduled_date, position)
            SELECT $1, lesson_id, scheduled_date, position
            FROM UNNEST($2::varchar[], $3::date[], $4::int[])
                AS plan(lesson_id, scheduled_date, position)
            ON CONFLICT (user_id, lesson_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(lesson_ids)
    .bind(dates)
    .bind(positions)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
