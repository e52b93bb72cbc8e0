//! Curriculum progress derived from scores: locking, per-unit completion and
//! the lesson a learner should take next.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    curriculum::{Curriculum, Lesson, Unit},
    schedule::CalendarIndex,
    score::{ScoreMap, is_completed},
};

/// A lesson is locked until the previous lesson of the same unit is completed.
pub fn is_lesson_locked(unit: &Unit, lesson_index: usize, scores: &ScoreMap) -> bool {
    match lesson_index.checked_sub(1).and_then(|prev| unit.lessons.get(prev)) {
        Some(previous) => !is_completed(scores, &previous.id),
        None => false,
    }
}

/// A unit is locked until every lesson of the previous unit is completed.
pub fn is_unit_locked(curriculum: &Curriculum, unit_index: usize, scores: &ScoreMap) -> bool {
    match unit_index.checked_sub(1).and_then(|prev| curriculum.units.get(prev)) {
        Some(previous) => !is_unit_completed(previous, scores),
        None => false,
    }
}

pub fn is_unit_completed(unit: &Unit, scores: &ScoreMap) -> bool {
    unit.lessons
        .iter()
        .all(|lesson| is_completed(scores, &lesson.id))
}

pub fn completed_lessons(unit: &Unit, scores: &ScoreMap) -> usize {
    unit.lessons
        .iter()
        .filter(|lesson| is_completed(scores, &lesson.id))
        .count()
}

/// Lesson state as shown on the unit screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonStatus {
    pub id: String,
    pub title: String,
    pub description: String,
    pub score: Option<u8>,
    pub completed: bool,
    pub locked: bool,
}

/// Unit state as shown on the home screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitStatus {
    pub id: String,
    pub title: String,
    pub locked: bool,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    /// Completion percentage, rounded to the nearest integer
    pub progress_percentage: u8,
    pub lessons: Vec<LessonStatus>,
}

/// Annotate the whole curriculum with the learner's scores.
pub fn curriculum_status(curriculum: &Curriculum, scores: &ScoreMap) -> Vec<UnitStatus> {
    curriculum
        .units
        .iter()
        .enumerate()
        .map(|(unit_index, unit)| {
            let lessons = unit
                .lessons
                .iter()
                .enumerate()
                .map(|(lesson_index, lesson)| LessonStatus {
                    id: lesson.id.clone(),
                    title: lesson.title.clone(),
                    description: lesson.description.clone(),
                    score: scores.get(&lesson.id).copied(),
                    completed: is_completed(scores, &lesson.id),
                    locked: is_lesson_locked(unit, lesson_index, scores),
                })
                .collect();

            let completed = completed_lessons(unit, scores);
            let total = unit.lessons.len();

            UnitStatus {
                id: unit.id.clone(),
                title: unit.title.clone(),
                locked: is_unit_locked(curriculum, unit_index, scores),
                completed_lessons: completed,
                total_lessons: total,
                progress_percentage: percentage(completed, total),
                lessons,
            }
        })
        .collect()
}

fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // part <= total, so the result is within 0..=100
    u8::try_from((part * 100 + total / 2) / total).unwrap_or(100)
}

/// The lesson suggested on the home screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextLesson {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub unit_title: String,
    /// Calendar date the lesson is planned for, when it came from the plan
    pub date: Option<NaiveDate>,
}

/// Pick the next lesson to study.
///
/// The first incomplete lesson planned on or after `today` wins. Without a
/// plan (or once the plan is exhausted) the first incomplete lesson in
/// curriculum order is used. Returns `None` when everything is completed.
pub fn next_lesson(
    curriculum: &Curriculum,
    index: &CalendarIndex,
    scores: &ScoreMap,
    today: NaiveDate,
) -> Option<NextLesson> {
    let planned = index
        .iter()
        .filter(|(date, _)| **date >= today)
        .find_map(|(date, lessons)| {
            lessons
                .iter()
                .find(|scheduled| !is_completed(scores, &scheduled.id))
                .map(|scheduled| (*date, scheduled.id.as_str()))
        });

    if let Some(next) =
        planned.and_then(|(date, lesson_id)| describe(curriculum, lesson_id, Some(date)))
    {
        return Some(next);
    }

    curriculum
        .lessons()
        .find(|lesson| !is_completed(scores, &lesson.id))
        .and_then(|lesson| describe(curriculum, &lesson.id, None))
}

fn describe(curriculum: &Curriculum, lesson_id: &str, date: Option<NaiveDate>) -> Option<NextLesson> {
    let lesson = curriculum.find_lesson(lesson_id)?;
    let unit = curriculum.unit_of(lesson_id)?;

    Some(NextLesson {
        lesson: lesson.clone(),
        unit_title: unit.title.clone(),
        date,
    })
}
