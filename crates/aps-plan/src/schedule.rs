//! Study-plan construction and reconciliation.
//!
//! A plan is a set of [`CalendarEntry`] values, one per lesson, produced once
//! from the user's date range and persisted by the caller. Every later load
//! turns the stored entries back into a [`CalendarIndex`], moving overdue and
//! still incomplete lessons onto today.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    curriculum::{Curriculum, fallback_lesson_name},
    score::{ScoreMap, is_completed},
};

/// One persisted assignment of a lesson to a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub lesson_id: String,
    pub date: NaiveDate,
}

/// A lesson as it appears on a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledLesson {
    pub id: String,
    pub name: String,
}

impl ScheduledLesson {
    fn for_lesson(curriculum: &Curriculum, lesson_id: &str) -> Self {
        let name = curriculum
            .find_lesson(lesson_id)
            .map(|lesson| lesson.title.clone())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| fallback_lesson_name(lesson_id));

        Self {
            id: lesson_id.to_string(),
            name,
        }
    }
}

/// The start/end pair picked during onboarding. Either side may still be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both bounds, if both were supplied.
    pub const fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Date → lessons mapping derived from calendar entries
///
/// Serializes as a JSON object keyed by ISO dates (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarIndex(BTreeMap<NaiveDate, Vec<ScheduledLesson>>);

impl CalendarIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group entries by their stored date, without any rollover.
    pub fn from_entries(curriculum: &Curriculum, entries: &[CalendarEntry]) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.push(entry.date, ScheduledLesson::for_lesson(curriculum, &entry.lesson_id));
        }
        index
    }

    fn push(&mut self, date: NaiveDate, lesson: ScheduledLesson) {
        self.0.entry(date).or_default().push(lesson);
    }

    pub fn lessons_on(&self, date: NaiveDate) -> &[ScheduledLesson] {
        self.0.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    /// Scheduled dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<ScheduledLesson>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of scheduled lessons across all dates.
    pub fn lesson_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Date a lesson is scheduled on, if any.
    pub fn date_of(&self, lesson_id: &str) -> Option<NaiveDate> {
        self.0
            .iter()
            .find(|(_, lessons)| lessons.iter().any(|lesson| lesson.id == lesson_id))
            .map(|(date, _)| *date)
    }
}

/// Result of turning stored entries into today's index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub index: CalendarIndex,
    /// Entries whose effective date was moved to today
    pub rolled_over: usize,
}

/// Rebuild the index from stored entries as seen on `today`.
///
/// An entry dated strictly before today whose lesson is not completed is
/// shown on today instead. Completed lessons keep their stored date. The
/// stored entries are left untouched.
pub fn reconcile(
    curriculum: &Curriculum,
    entries: &[CalendarEntry],
    scores: &ScoreMap,
    today: NaiveDate,
) -> Reconciliation {
    let mut index = CalendarIndex::new();
    let mut rolled_over = 0;

    for entry in entries {
        let date = if entry.date < today && !is_completed(scores, &entry.lesson_id) {
            rolled_over += 1;
            today
        } else {
            entry.date
        };
        index.push(date, ScheduledLesson::for_lesson(curriculum, &entry.lesson_id));
    }

    Reconciliation { index, rolled_over }
}

/// Number of calendar days covered by `start..=end`, never less than one.
pub fn span_days(start: NaiveDate, end: NaiveDate) -> usize {
    let days = (end - start).num_days() + 1;
    usize::try_from(days).unwrap_or(0).max(1)
}

/// Lay out every incomplete lesson between `start` and `end`.
///
/// Lessons are taken in curriculum order and packed `ceil(remaining / days)`
/// per day starting at `start`. An `end` before `start` counts as a single
/// day, so every lesson lands on `start`.
pub fn build_plan(
    curriculum: &Curriculum,
    scores: &ScoreMap,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CalendarEntry> {
    let remaining: Vec<&str> = curriculum
        .lessons()
        .filter(|lesson| !is_completed(scores, &lesson.id))
        .map(|lesson| lesson.id.as_str())
        .collect();

    if remaining.is_empty() {
        return Vec::new();
    }

    let per_day = remaining.len().div_ceil(span_days(start, end));

    let mut entries = Vec::with_capacity(remaining.len());
    let mut current = start;
    let mut on_current = 0;

    for lesson_id in remaining {
        entries.push(CalendarEntry {
            lesson_id: lesson_id.to_string(),
            date: current,
        });
        on_current += 1;

        if on_current >= per_day {
            current = current
                .checked_add_days(Days::new(1))
                .unwrap_or(current);
            on_current = 0;
        }
    }

    entries
}
