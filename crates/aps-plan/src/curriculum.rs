//! Course content: ordered units of ordered lessons.
//!
//! The order of units, and of lessons inside a unit, drives both plan
//! construction and lesson locking.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::PlanError;

/// Curriculum bundled with the service.
const BUNDLED_CURRICULUM: &str = include_str!("../curriculum/apcsa.json");

/// A single lesson, identified by a stable `lessonN` id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A unit groups lessons in the order they must be taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

/// The full course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    pub units: Vec<Unit>,
}

impl Curriculum {
    /// Load the AP CSA curriculum shipped with the crate.
    pub fn bundled() -> Result<Self, PlanError> {
        Self::from_json(BUNDLED_CURRICULUM)
    }

    /// Parse and validate a curriculum from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let curriculum: Self = serde_json::from_str(json)?;
        curriculum.validate()?;
        Ok(curriculum)
    }

    /// Build a curriculum from already constructed units.
    pub fn new(units: Vec<Unit>) -> Result<Self, PlanError> {
        let curriculum = Self { units };
        curriculum.validate()?;
        Ok(curriculum)
    }

    fn validate(&self) -> Result<(), PlanError> {
        if self.units.is_empty() {
            return Err(PlanError::InvalidCurriculum(
                "curriculum has no units".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for unit in &self.units {
            if unit.id.trim().is_empty() {
                return Err(PlanError::InvalidCurriculum(
                    "unit id cannot be empty".to_string(),
                ));
            }
            for lesson in &unit.lessons {
                if lesson.id.trim().is_empty() {
                    return Err(PlanError::InvalidCurriculum(format!(
                        "lesson id cannot be empty (unit '{}')",
                        unit.id
                    )));
                }
                if !seen.insert(lesson.id.as_str()) {
                    return Err(PlanError::InvalidCurriculum(format!(
                        "duplicate lesson id '{}'",
                        lesson.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// All lessons in curriculum order (unit order, then lesson order).
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.units.iter().flat_map(|unit| unit.lessons.iter())
    }

    pub fn lesson_count(&self) -> usize {
        self.units.iter().map(|unit| unit.lessons.len()).sum()
    }

    pub fn find_lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons().find(|lesson| lesson.id == lesson_id)
    }

    pub fn contains_lesson(&self, lesson_id: &str) -> bool {
        self.find_lesson(lesson_id).is_some()
    }

    /// The unit a lesson belongs to.
    pub fn unit_of(&self, lesson_id: &str) -> Option<&Unit> {
        self.units
            .iter()
            .find(|unit| unit.lessons.iter().any(|lesson| lesson.id == lesson_id))
    }
}

/// Display name for a lesson that has no title at hand, e.g. `Lesson 12`.
pub fn fallback_lesson_name(lesson_id: &str) -> String {
    format!("Lesson {}", lesson_id.trim_start_matches("lesson"))
}
