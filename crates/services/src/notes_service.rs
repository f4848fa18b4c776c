use std::sync::Arc;

use lms_core::model::{LessonId, LessonNote, NoteBook, UserId};
use storage::StoreKey;
use storage::repository::{KeyValueStore, load_json, save_json};

use crate::Clock;
use crate::error::NotesServiceError;

/// Per-user lesson notes kept in the local store.
#[derive(Clone)]
pub struct NotesService {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
}

impl NotesService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn KeyValueStore>) -> Self {
        Self { clock, store }
    }

    /// Write the note for a lesson, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Note` if the content is blank.
    /// Returns `NotesServiceError::Storage` if persistence fails.
    pub async fn save_note(
        &self,
        user_id: &UserId,
        lesson_id: &LessonId,
        content: &str,
    ) -> Result<LessonNote, NotesServiceError> {
        let note = LessonNote::new(content, self.clock.now())?;
        let key = StoreKey::UserNotes(user_id.clone());
        let mut book = self.load(&key).await?;
        book.put(lesson_id.clone(), note.clone());
        save_json(self.store.as_ref(), &key, &book).await?;
        tracing::info!(%user_id, %lesson_id, "saved lesson note");
        Ok(note)
    }

    /// # Errors
    ///
    /// Returns `NotesServiceError::Storage` if the notes cannot be read.
    pub async fn get_note(
        &self,
        user_id: &UserId,
        lesson_id: &LessonId,
    ) -> Result<Option<LessonNote>, NotesServiceError> {
        let book = self.load(&StoreKey::UserNotes(user_id.clone())).await?;
        Ok(book.get(lesson_id).cloned())
    }

    /// All notes of a user, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Storage` if the notes cannot be read.
    pub async fn list_notes(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<(LessonId, LessonNote)>, NotesServiceError> {
        let book = self.load(&StoreKey::UserNotes(user_id.clone())).await?;
        Ok(book.recent_first())
    }

    /// Returns `true` if a note was removed.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Storage` if the notes cannot be read or written.
    pub async fn delete_note(
        &self,
        user_id: &UserId,
        lesson_id: &LessonId,
    ) -> Result<bool, NotesServiceError> {
        let key = StoreKey::UserNotes(user_id.clone());
        let mut book = self.load(&key).await?;
        if book.remove(lesson_id).is_none() {
            return Ok(false);
        }
        save_json(self.store.as_ref(), &key, &book).await?;
        Ok(true)
    }

    async fn load(&self, key: &StoreKey) -> Result<NoteBook, NotesServiceError> {
        Ok(load_json::<NoteBook>(self.store.as_ref(), key)
            .await?
            .unwrap_or_default())
    }
}
