use sqlx::{Executor, Postgres};
use uuid::Uuid;

/// Remove every piece of study data stored for a user.
///
/// Runs as one statement so the deletion is all-or-nothing.
pub async fn delete_user_data<'e, E>(executor: E, user_id: Uuid) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            WITH
                scores AS (DELETE FROM lesson_scores WHERE user_id = $1),
                attempts AS (DELETE FROM quiz_attempts WHERE user_id = $1),
                calendar AS (DELETE FROM calendar_entries WHERE user_id = $1),
                ranges AS (DELETE FROM study_ranges WHERE user_id = $1),
                activity AS (DELETE FROM user_activity WHERE user_id = $1)
            DELETE FROM user_progress WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(())
}
