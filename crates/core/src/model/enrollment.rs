use serde::{Deserialize, Serialize};

use crate::model::ids::CourseId;

/// Course ids the learner is enrolled in.
///
/// Stored as a plain JSON array; order carries no meaning but is kept stable
/// so rewrites of the persisted value stay diff-friendly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentSet(Vec<CourseId>);

impl EnrollmentSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &CourseId) -> bool {
        self.0.contains(id)
    }

    /// Returns `false` if the id was already present.
    pub fn insert(&mut self, id: CourseId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Returns `true` if the id was present.
    pub fn remove(&mut self, id: &CourseId) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseId> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_ignores_duplicates() {
        let mut set = EnrollmentSet::new();
        assert!(set.insert(CourseId::new("1")));
        assert!(!set.insert(CourseId::new("1")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_reports_presence() {
        let mut set = EnrollmentSet::new();
        set.insert(CourseId::new("1"));
        assert!(set.remove(&CourseId::new("1")));
        assert!(!set.remove(&CourseId::new("1")));
        assert!(set.is_empty());
    }

    #[test]
    fn persists_as_string_array() {
        let mut set = EnrollmentSet::new();
        set.insert(CourseId::new("2"));
        set.insert(CourseId::new("1"));
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["2","1"]"#);
    }
}
