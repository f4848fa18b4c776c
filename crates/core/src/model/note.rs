use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::LessonId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NoteError {
    #[error("note content cannot be empty")]
    EmptyContent,
}

/// A learner's free-form note attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonNote {
    content: String,
    updated_at: DateTime<Utc>,
}

impl LessonNote {
    /// Create a note with trimmed content.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::EmptyContent` if the content is blank.
    pub fn new(content: impl Into<String>, updated_at: DateTime<Utc>) -> Result<Self, NoteError> {
        let raw = content.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NoteError::EmptyContent);
        }
        Ok(Self {
            content: trimmed.to_owned(),
            updated_at,
        })
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// All notes of one learner, keyed by lesson id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteBook {
    notes: BTreeMap<LessonId, LessonNote>,
}

impl NoteBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the note for a lesson.
    pub fn put(&mut self, lesson_id: LessonId, note: LessonNote) {
        self.notes.insert(lesson_id, note);
    }

    #[must_use]
    pub fn get(&self, lesson_id: &LessonId) -> Option<&LessonNote> {
        self.notes.get(lesson_id)
    }

    pub fn remove(&mut self, lesson_id: &LessonId) -> Option<LessonNote> {
        self.notes.remove(lesson_id)
    }

    /// Notes ordered by most recently updated first.
    #[must_use]
    pub fn recent_first(&self) -> Vec<(LessonId, LessonNote)> {
        let mut notes: Vec<_> = self
            .notes
            .iter()
            .map(|(id, note)| (id.clone(), note.clone()))
            .collect();
        notes.sort_by(|a, b| b.1.updated_at.cmp(&a.1.updated_at).then_with(|| a.0.cmp(&b.0)));
        notes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
