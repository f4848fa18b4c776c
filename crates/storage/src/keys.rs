use std::fmt;

use lms_core::model::UserId;

/// Namespaced keys of the local store.
///
/// The string forms are part of the persisted layout and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// JSON array of course records.
    Courses,
    /// JSON array of enrolled course ids.
    EnrolledCourses,
    /// JSON object of course id to watched lesson ids.
    WatchedVideos,
    /// JSON object of lesson id to `{content, updatedAt}` for one user.
    UserNotes(UserId),
}

impl StoreKey {
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            StoreKey::Courses => "courses".to_owned(),
            StoreKey::EnrolledCourses => "enrolled_courses".to_owned(),
            StoreKey::WatchedVideos => "watched_videos".to_owned(),
            StoreKey::UserNotes(user) => format!("user-notes-{user}"),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}
