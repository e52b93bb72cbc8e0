use std::collections::HashMap;

/// Number of questions drawn for every lesson quiz.
pub const QUESTIONS_PER_QUIZ: u8 = 4;

/// A lesson counts as completed once its quiz was answered fully correctly.
pub const COMPLETED_SCORE: u8 = QUESTIONS_PER_QUIZ;

/// Last recorded score per lesson id. Absent lessons were never attempted.
pub type ScoreMap = HashMap<String, u8>;

/// Whether the lesson has been completed according to `scores`.
pub fn is_completed(scores: &ScoreMap, lesson_id: &str) -> bool {
    scores.get(lesson_id).copied() == Some(COMPLETED_SCORE)
}

/// Whether `score` is a value a quiz can produce.
pub fn is_valid_score(score: i32) -> bool {
    (0..=i32::from(QUESTIONS_PER_QUIZ)).contains(&score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_completed() {
        let mut scores = ScoreMap::new();
        scores.insert("lesson1".to_string(), 4);
        scores.insert("lesson2".to_string(), 3);

        assert!(is_completed(&scores, "lesson1"));
        assert!(!is_completed(&scores, "lesson2"));
        assert!(!is_completed(&scores, "lesson3")); // never attempted
    }

    #[test]
    fn test_is_valid_score() {
        assert!(is_valid_score(0));
        assert!(is_valid_score(4));
        assert!(!is_valid_score(-1));
        assert!(!is_valid_score(5));
    }
}
