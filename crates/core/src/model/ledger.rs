use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::ids::{CourseId, LessonId};

/// Watched lessons per course.
///
/// Append-only: there is no way to unwatch a lesson. Serializes as a JSON
/// object mapping course id to an array of lesson ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchedLedger {
    courses: BTreeMap<CourseId, BTreeSet<LessonId>>,
}

impl WatchedLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lesson as watched.
    ///
    /// Returns `true` if the lesson was not already recorded. The per-course
    /// entry is created lazily on the first mark.
    pub fn mark(&mut self, course_id: &CourseId, lesson_id: LessonId) -> bool {
        self.courses
            .entry(course_id.clone())
            .or_default()
            .insert(lesson_id)
    }

    #[must_use]
    pub fn is_watched(&self, course_id: &CourseId, lesson_id: &LessonId) -> bool {
        self.courses
            .get(course_id)
            .is_some_and(|lessons| lessons.contains(lesson_id))
    }

    /// Watched lessons for a course, if any were ever marked.
    #[must_use]
    pub fn watched(&self, course_id: &CourseId) -> Option<&BTreeSet<LessonId>> {
        self.courses.get(course_id)
    }

    #[must_use]
    pub fn watched_count(&self, course_id: &CourseId) -> usize {
        self.watched(course_id).map_or(0, BTreeSet::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
