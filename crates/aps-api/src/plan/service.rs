//! Build-or-load for a user's study plan.

use aps_db::repositories::{calendar, range};
use aps_plan::{
    CalendarEntry, CalendarIndex, Curriculum, DateRange, ScoreMap,
    schedule::{self, Reconciliation},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::ApiError, metrics::record_plan_event};

/// How the returned index was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Read back from stored entries
    Loaded,
    /// Constructed and persisted by this call
    Built,
    /// No stored plan and the date range is incomplete
    NeedsDateRange,
}

impl PlanStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Built => "built",
            Self::NeedsDateRange => "needs_date_range",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome {
    pub status: PlanStatus,
    pub index: CalendarIndex,
    /// Stored entries shown on today instead of their overdue date
    pub rolled_over: usize,
}

/// Current calendar day in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Load the user's stored plan, or build and store one from their date range
///
/// Stored entries are never rewritten: overdue lessons that are not yet
/// completed are moved onto `today` in the returned index only. Store
/// failures are returned as errors rather than an empty plan.
pub async fn build_or_load(
    pool: &PgPool,
    curriculum: &Curriculum,
    user_id: Uuid,
    scores: &ScoreMap,
    today: NaiveDate,
) -> Result<PlanOutcome, ApiError> {
    let stored = load_entries(pool, user_id).await?;

    let outcome = if !stored.is_empty() {
        loaded(curriculum, &stored, scores, today)
    } else {
        let date_range: DateRange = range::get_range(pool, user_id)
            .await?
            .map(Into::into)
            .unwrap_or_default();

        match date_range.bounds() {
            None => {
                tracing::info!(%user_id, "No stored plan and no date range yet");
                PlanOutcome {
                    status: PlanStatus::NeedsDateRange,
                    index: CalendarIndex::new(),
                    rolled_over: 0,
                }
            }
            Some((start, end)) => build(pool, curriculum, user_id, scores, start, end, today).await?,
        }
    };

    record_plan_event(outcome.status, outcome.rolled_over);

    Ok(outcome)
}

async fn load_entries(pool: &PgPool, user_id: Uuid) -> Result<Vec<CalendarEntry>, ApiError> {
    let rows = calendar::list_for_user(pool, user_id).await?;
    Ok(rows.into_iter().map(CalendarEntry::from).collect())
}

fn loaded(
    curriculum: &Curriculum,
    entries: &[CalendarEntry],
    scores: &ScoreMap,
    today: NaiveDate,
) -> PlanOutcome {
    let Reconciliation { index, rolled_over } =
        schedule::reconcile(curriculum, entries, scores, today);

    tracing::debug!(
        entries = entries.len(),
        rolled_over,
        "Loaded stored study plan"
    );

    PlanOutcome {
        status: PlanStatus::Loaded,
        index,
        rolled_over,
    }
}

async fn build(
    pool: &PgPool,
    curriculum: &Curriculum,
    user_id: Uuid,
    scores: &ScoreMap,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<PlanOutcome, ApiError> {
    let plan = schedule::build_plan(curriculum, scores, start, end);
    let inserted = calendar::insert_plan(pool, user_id, &plan).await?;

    // A concurrent builder stored its plan first; that one wins
    if inserted != plan.len() as u64 {
        tracing::warn!(
            %user_id,
            inserted,
            planned = plan.len(),
            "Plan was stored concurrently, reloading"
        );
        let stored = load_entries(pool, user_id).await?;
        return Ok(loaded(curriculum, &stored, scores, today));
    }

    tracing::info!(
        %user_id,
        %start,
        %end,
        lessons = plan.len(),
        "Built new study plan"
    );

    Ok(PlanOutcome {
        status: PlanStatus::Built,
        index: CalendarIndex::from_entries(curriculum, &plan),
        rolled_over: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_status_serialization() {
        assert_eq!(
            serde_json::to_string(&PlanStatus::NeedsDateRange).unwrap(),
            r#""needs_date_range""#
        );
        assert_eq!(PlanStatus::Built.as_str(), "built");
        assert_eq!(PlanStatus::Loaded.as_str(), "loaded");
    }
}
