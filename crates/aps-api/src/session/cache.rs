use aps_db::{models::ScoreRecord, repositories::score};
use aps_plan::ScoreMap;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

/// In-memory copy of a user's lesson scores
///
/// Filled from the store on sign-in and on explicit reload. Between loads it
/// is the source of truth for plan building, and quiz submissions update it
/// after the store write succeeds.
#[derive(Debug, Clone, Default)]
pub struct ScoreCache {
    scores: ScoreMap,
    loaded_at: Option<DateTime<Utc>>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with the user's stored scores
    ///
    /// On error the previous contents are kept.
    pub async fn load<'e, E>(&mut self, executor: E, user_id: Uuid) -> Result<usize, sqlx::Error>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = score::list_for_user(executor, user_id).await?;
        self.replace(records);

        tracing::debug!(%user_id, lessons = self.scores.len(), "Score cache loaded");

        Ok(self.scores.len())
    }

    /// Swap in a fresh set of records, dropping everything cached before
    pub fn replace(&mut self, records: Vec<ScoreRecord>) {
        self.scores = records
            .into_iter()
            .filter_map(|record| match u8::try_from(record.score) {
                Ok(score) => Some((record.lesson_id, score)),
                Err(_) => {
                    tracing::warn!(
                        lesson_id = %record.lesson_id,
                        score = record.score,
                        "Skipping out-of-range stored score"
                    );
                    None
                }
            })
            .collect();
        self.loaded_at = Some(Utc::now());
    }

    /// Cached score for a lesson, `None` if never attempted
    pub fn get(&self, lesson_id: &str) -> Option<u8> {
        self.scores.get(lesson_id).copied()
    }

    pub fn update(&mut self, lesson_id: &str, score: u8) {
        self.scores.insert(lesson_id.to_string(), score);
    }

    pub fn scores(&self) -> &ScoreMap {
        &self.scores
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }
}
