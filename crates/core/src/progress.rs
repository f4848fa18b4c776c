//! Course progress rollup.
//!
//! Progress is always recomputed from scratch from the lesson tree and the
//! watched set. Nothing is carried over from the previous value, so the
//! stored `progress`/`hours_completed` can never drift from the ledger.

use std::collections::BTreeSet;

use crate::model::{Course, LessonId};

/// Result of a single rollup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub total_lessons: usize,
    pub completed_lessons: usize,
    /// Rounded percentage in `0..=100`.
    pub progress: u8,
    pub hours_completed: f64,
}

/// Percentage of completed lessons, rounded half away from zero.
///
/// A course with no lessons is 0% complete.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = completed.min(total) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

/// Hours completed for a given percentage of `total_hours`.
#[must_use]
pub fn hours_for_percent(total_hours: f64, progress: u8) -> f64 {
    total_hours * f64::from(progress) / 100.0
}

/// Recompute a course's derived progress from its watched lessons.
///
/// The ledger is the only source of truth: a course with no ledger entry has
/// nothing watched. Each lesson's `is_completed` flag is overwritten to match
/// the ledger, then `progress` and `hours_completed` are written onto the
/// course.
pub fn rollup(course: &mut Course, watched: Option<&BTreeSet<LessonId>>) -> ProgressSnapshot {
    let empty = BTreeSet::new();
    let watched = watched.unwrap_or(&empty);
    let total_lessons = course.total_lessons();
    let mut completed_lessons = 0;

    for lesson in course.lessons_mut() {
        lesson.is_completed = watched.contains(&lesson.id);
        if lesson.is_completed {
            completed_lessons += 1;
        }
    }

    let progress = completion_percent(completed_lessons, total_lessons);
    let hours_completed = hours_for_percent(course.total_hours, progress);
    course.set_progress(progress, hours_completed);

    ProgressSnapshot {
        total_lessons,
        completed_lessons,
        progress,
        hours_completed,
    }
}
