use aps_plan::{CalendarEntry, DateRange};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Last recorded score for one lesson
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScoreRecord {
    /// Lesson identifier (`lessonN`)
    pub lesson_id: String,
    /// Correct answers, 0 to 4
    pub score: i16,
    /// Questions asked
    pub total: i16,
    pub time_taken_secs: i32,
    pub recorded_at: DateTime<Utc>,
}

/// One quiz submission, kept for history
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuizAttempt {
    pub lesson_id: String,
    pub score: i16,
    pub total: i16,
    pub time_taken_secs: i32,
    pub recorded_at: DateTime<Utc>,
}

/// Stored calendar assignment
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CalendarEntryRow {
    pub lesson_id: String,
    pub scheduled_date: NaiveDate,
}

impl From<CalendarEntryRow> for CalendarEntry {
    fn from(row: CalendarEntryRow) -> Self {
        Self {
            lesson_id: row.lesson_id,
            date: row.scheduled_date,
        }
    }
}

/// Onboarding date range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<StudyRange> for DateRange {
    fn from(range: StudyRange) -> Self {
        Self {
            start: range.start_date,
            end: range.end_date,
        }
    }
}

/// Streak state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProgress {
    pub streak: i32,
    pub last_completed_date: Option<NaiveDate>,
}

/// Quizzes taken on a given day
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityDay {
    pub activity_date: NaiveDate,
    pub quizzes_count: i32,
}
