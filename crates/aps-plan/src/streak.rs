use chrono::{Days, NaiveDate};

/// Compute the streak after a quiz completed on `today`.
///
/// * Already completed something today: the streak is kept (at least 1)
/// * Last completion was yesterday: the streak grows by one
/// * Anything older, or nothing at all: the streak restarts at 1
pub fn next_streak(last_completed: Option<NaiveDate>, current: i32, today: NaiveDate) -> i32 {
    let yesterday = today.checked_sub_days(Days::new(1));

    match last_completed {
        Some(last) if last == today => current.max(1),
        Some(last) if Some(last) == yesterday => current.max(0) + 1,
        _ => 1,
    }
}

/// Streak as it should be displayed on `today`.
///
/// A streak whose last completion is older than yesterday is already broken,
/// even though nothing has been written since.
pub fn displayed_streak(last_completed: Option<NaiveDate>, current: i32, today: NaiveDate) -> i32 {
    let yesterday = today.checked_sub_days(Days::new(1));

    match last_completed {
        Some(last) if last == today || Some(last) == yesterday => current.max(0),
        _ => 0,
    }
}
