use aps_plan::{Curriculum, QUESTIONS_PER_QUIZ, score::is_valid_score};
use chrono::NaiveDate;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::error::ApiError;

/// Check that a lesson id names a lesson of the curriculum
///
/// # Examples
/// ```
/// use aps_api::validation::validate_lesson_id;
/// use aps_plan::Curriculum;
///
/// let curriculum = Curriculum::bundled().unwrap();
/// assert!(validate_lesson_id(&curriculum, "lesson1").is_ok());
/// assert!(validate_lesson_id(&curriculum, "lesson999").is_err());
/// ```
pub fn validate_lesson_id(curriculum: &Curriculum, lesson_id: &str) -> Result<(), ApiError> {
    if curriculum.contains_lesson(lesson_id) {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("Unknown lesson '{lesson_id}'")))
    }
}

/// Check a submitted quiz score and convert it to its stored form
pub fn validate_quiz_score(score: i32, total: i32) -> Result<u8, ApiError> {
    if total != i32::from(QUESTIONS_PER_QUIZ) {
        return Err(ApiError::Validation(format!(
            "A quiz has exactly {QUESTIONS_PER_QUIZ} questions, got total {total}"
        )));
    }

    if !is_valid_score(score) {
        return Err(ApiError::Validation(format!(
            "Score must be between 0 and {QUESTIONS_PER_QUIZ}, got {score}"
        )));
    }

    u8::try_from(score).map_err(|_| ApiError::Validation(format!("Invalid score {score}")))
}

/// Range bounds may be set one at a time, but never inverted
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ApiError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ApiError::Validation(format!(
            "End date {end} is before start date {start}"
        ))),
        _ => Ok(()),
    }
}

/// Flatten `validator` errors into one readable message
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .errors()
        .iter()
        .flat_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(field_errors) => field_errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: invalid value ({})", error.code),
                })
                .collect::<Vec<_>>(),
            _ => vec![format!("{field}: invalid value")],
        })
        .collect();

    messages.sort();
    messages.join(", ")
}
