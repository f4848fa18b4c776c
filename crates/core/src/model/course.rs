use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, InstructorId, LessonId, SectionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("total hours must be finite and >= 0 (got {0})")]
    InvalidTotalHours(f64),

    #[error("price must be finite and >= 0 (got {0})")]
    InvalidPrice(f64),

    #[error("lesson id {0} appears more than once in the course")]
    DuplicateLesson(LessonId),
}

//
// ─── LESSON TREE ───────────────────────────────────────────────────────────────
//

/// A single lesson inside a section.
///
/// `is_completed` is a stored mirror of the watched-lesson ledger. The ledger
/// is authoritative and every rollup overwrites this flag from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseLesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl CourseLesson {
    #[must_use]
    pub fn new(id: impl Into<LessonId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration: String::new(),
            video_url: None,
            transcript: None,
            is_completed: false,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    #[must_use]
    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }
}

/// An ordered group of lessons.
///
/// `duration` is a display string only; `expanded` is UI state and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSection {
    pub id: SectionId,
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub lessons: Vec<CourseLesson>,
    #[serde(skip)]
    pub expanded: bool,
}

impl CourseSection {
    #[must_use]
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration: String::new(),
            lessons: Vec::new(),
            expanded: false,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    #[must_use]
    pub fn with_lesson(mut self, lesson: CourseLesson) -> Self {
        self.lessons.push(lesson);
        self
    }
}

//
// ─── COURSE METADATA ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: InstructorId,
    pub name: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Published,
    #[default]
    Draft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub question_count: u32,
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course record as persisted in the catalog.
///
/// `enrolled`, `progress` and `hours_completed` are derived state. They are
/// absent for courses the learner is not enrolled in and are skipped on
/// serialization, so clearing them removes the keys from the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    id: CourseId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<Instructor>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sections: Vec<CourseSection>,
    #[serde(default)]
    pub assignments: Vec<AssignmentSummary>,
    #[serde(default)]
    pub quizzes: Vec<QuizSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hours_completed: Option<f64>,
    pub total_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enrolled: Option<bool>,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Course {
    /// Creates an empty draft course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank, or
    /// `CourseError::InvalidTotalHours` if `total_hours` is negative or not finite.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        total_hours: f64,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        if !total_hours.is_finite() || total_hours < 0.0 {
            return Err(CourseError::InvalidTotalHours(total_hours));
        }
        Ok(Self {
            id,
            title,
            category: String::new(),
            instructor: None,
            description: String::new(),
            sections: Vec::new(),
            assignments: Vec::new(),
            quizzes: Vec::new(),
            progress: None,
            hours_completed: None,
            total_hours,
            enrolled: None,
            status: CourseStatus::Draft,
            price: 0.0,
            tags: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_instructor(mut self, instructor: Instructor) -> Self {
        self.instructor = Some(instructor);
        self
    }

    #[must_use]
    pub fn with_section(mut self, section: CourseSection) -> Self {
        self.sections.push(section);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: CourseStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn is_enrolled(&self) -> bool {
        self.enrolled.unwrap_or(false)
    }

    /// Completion percentage (0-100), or `None` when not tracked.
    #[must_use]
    pub fn progress(&self) -> Option<u8> {
        self.progress
    }

    #[must_use]
    pub fn hours_completed(&self) -> Option<f64> {
        self.hours_completed
    }

    /// Iterates all lessons across sections in display order.
    pub fn lessons(&self) -> impl Iterator<Item = &CourseLesson> {
        self.sections.iter().flat_map(|section| section.lessons.iter())
    }

    pub(crate) fn lessons_mut(&mut self) -> impl Iterator<Item = &mut CourseLesson> {
        self.sections
            .iter_mut()
            .flat_map(|section| section.lessons.iter_mut())
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.sections.iter().map(|section| section.lessons.len()).sum()
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&CourseLesson> {
        self.lessons().find(|lesson| &lesson.id == id)
    }

    /// Check the invariants a course must satisfy before it is persisted.
    ///
    /// Lesson ids must be unique across the whole course because the
    /// watched-lesson ledger keys by lesson id alone.
    ///
    /// # Errors
    ///
    /// Returns the first `CourseError` found.
    pub fn validate(&self) -> Result<(), CourseError> {
        if self.title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        if !self.total_hours.is_finite() || self.total_hours < 0.0 {
            return Err(CourseError::InvalidTotalHours(self.total_hours));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CourseError::InvalidPrice(self.price));
        }
        let mut seen = HashSet::new();
        for lesson in self.lessons() {
            if !seen.insert(&lesson.id) {
                return Err(CourseError::DuplicateLesson(lesson.id.clone()));
            }
        }
        Ok(())
    }

    /// Start tracking enrollment: enrolled with zero progress.
    pub fn mark_enrolled(&mut self) {
        self.enrolled = Some(true);
        self.progress = Some(0);
        self.hours_completed = Some(0.0);
    }

    /// Drop every enrollment-derived field from the record.
    pub fn clear_enrollment(&mut self) {
        self.enrolled = None;
        self.progress = None;
        self.hours_completed = None;
    }

    pub(crate) fn set_progress(&mut self, progress: u8, hours_completed: f64) {
        self.progress = Some(progress);
        self.hours_completed = Some(hours_completed);
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Input for creating a new course from the admin back-office.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub title: String,
    pub category: String,
    pub description: String,
    pub instructor: Option<Instructor>,
    pub total_hours: f64,
    pub price: f64,
    pub tags: Vec<String>,
}

impl CourseDraft {
    /// Validate the draft and assign it an id. New courses start as drafts.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the draft fails validation.
    pub fn into_course(self, id: CourseId) -> Result<Course, CourseError> {
        let mut course = Course::new(id, self.title, self.total_hours)?
            .with_category(self.category)
            .with_description(self.description)
            .with_price(self.price)
            .with_tags(self.tags);
        course.instructor = self.instructor;
        course.validate()?;
        Ok(course)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
