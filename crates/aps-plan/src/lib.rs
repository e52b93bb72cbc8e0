//! Study planning library for the AP CSA planner
//!
//! This crate holds the domain logic that does not touch the database:
//! the curriculum model, lesson scores, study-plan construction and
//! rollover reconciliation, streak bookkeeping, and lesson locking.

pub mod curriculum;
pub mod progress;
pub mod schedule;
pub mod score;
pub mod streak;

pub use curriculum::{Curriculum, Lesson, Unit};
pub use schedule::{CalendarEntry, CalendarIndex, DateRange, ScheduledLesson};
pub use score::{COMPLETED_SCORE, QUESTIONS_PER_QUIZ, ScoreMap};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Failed to parse curriculum: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid curriculum: {0}")]
    InvalidCurriculum(String),
}
