use std::sync::Arc;

use lms_core::model::{Course, CourseDraft, CourseId, CourseStatus, EnrollmentSet};
use lms_core::seed::seed_courses;
use storage::StoreKey;
use storage::repository::{KeyValueStore, load_json, save_json};

use crate::error::CourseServiceError;

/// Catalog page filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    /// Case-insensitive category match.
    pub category: Option<String>,
    pub status: Option<CourseStatus>,
    /// Case-insensitive exact tag match.
    pub tag: Option<String>,
    /// Case-insensitive substring over title, description and tags.
    pub query: Option<String>,
}

impl CourseFilter {
    #[must_use]
    pub fn matches(&self, course: &Course) -> bool {
        let category_ok = self
            .category
            .as_ref()
            .is_none_or(|category| course.category.eq_ignore_ascii_case(category));
        let status_ok = self.status.is_none_or(|status| course.status == status);
        let tag_ok = self
            .tag
            .as_ref()
            .is_none_or(|tag| course.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)));
        category_ok && status_ok && tag_ok && self.matches_query(course)
    }

    fn matches_query(&self, course: &Course) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        course.title.to_lowercase().contains(&needle)
            || course.description.to_lowercase().contains(&needle)
            || course.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

/// Owns the canonical course records.
///
/// Every mutation rewrites the whole `courses` document. On first access
/// with nothing persisted, the seed catalog is written and returned.
#[derive(Clone)]
pub struct CourseCatalogService {
    store: Arc<dyn KeyValueStore>,
}

impl CourseCatalogService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// List every known course.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the catalog cannot be read or
    /// the first-run seed cannot be written.
    pub async fn list(&self) -> Result<Vec<Course>, CourseServiceError> {
        if let Some(courses) = load_json::<Vec<Course>>(self.store.as_ref(), &StoreKey::Courses).await? {
            return Ok(courses);
        }
        let courses = seed_courses()?;
        self.persist(&courses).await?;
        tracing::info!(count = courses.len(), "seeded empty course catalog");
        Ok(courses)
    }

    /// List courses matching a filter, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the catalog cannot be read.
    pub async fn list_filtered(
        &self,
        filter: &CourseFilter,
    ) -> Result<Vec<Course>, CourseServiceError> {
        let courses = self.list().await?;
        Ok(courses.into_iter().filter(|c| filter.matches(c)).collect())
    }

    /// Fetch a course by ID.
    ///
    /// Returns `Ok(None)` when the course does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the catalog cannot be read.
    pub async fn get(&self, id: &CourseId) -> Result<Option<Course>, CourseServiceError> {
        let courses = self.list().await?;
        Ok(courses.into_iter().find(|c| c.id() == id))
    }

    /// Replace the course with the same id, or append it.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` if the course is invalid.
    /// Returns `CourseServiceError::Storage` if persistence fails.
    pub async fn save(&self, course: &Course) -> Result<(), CourseServiceError> {
        course.validate()?;
        self.upsert(course).await
    }

    /// Write derived fields (enrollment, progress) back without validation.
    ///
    /// Records loaded from older stores may not pass `validate`; they still
    /// have to accept enrollment and progress updates.
    pub(crate) async fn upsert(&self, course: &Course) -> Result<(), CourseServiceError> {
        let mut courses = self.list().await?;
        match courses.iter_mut().find(|c| c.id() == course.id()) {
            Some(existing) => *existing = course.clone(),
            None => {
                tracing::info!(course_id = %course.id(), "adding course to catalog");
                courses.push(course.clone());
            }
        }
        self.persist(&courses).await
    }

    /// Create a new draft course with a generated id.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` for validation failures.
    /// Returns `CourseServiceError::Storage` if persistence fails.
    pub async fn create_course(&self, draft: CourseDraft) -> Result<Course, CourseServiceError> {
        let course = draft.into_course(CourseId::generate())?;
        self.save(&course).await?;
        Ok(course)
    }

    /// Remove a course and drop it from the enrollment set.
    ///
    /// Returns `true` if the course existed.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the catalog or enrollment set
    /// cannot be read or written.
    pub async fn delete(&self, id: &CourseId) -> Result<bool, CourseServiceError> {
        let mut courses = self.list().await?;
        let before = courses.len();
        courses.retain(|c| c.id() != id);
        let removed = courses.len() != before;
        if removed {
            self.persist(&courses).await?;
            tracing::info!(course_id = %id, "deleted course");
        }

        let mut enrolled: EnrollmentSet = load_json(self.store.as_ref(), &StoreKey::EnrolledCourses)
            .await?
            .unwrap_or_default();
        if enrolled.remove(id) {
            save_json(self.store.as_ref(), &StoreKey::EnrolledCourses, &enrolled).await?;
        }
        Ok(removed)
    }

    async fn persist(&self, courses: &[Course]) -> Result<(), CourseServiceError> {
        save_json(self.store.as_ref(), &StoreKey::Courses, courses).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lms_core::model::{CourseError, CourseLesson, CourseSection};
    use storage::repository::InMemoryStore;

    fn service() -> CourseCatalogService {
        CourseCatalogService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn first_list_seeds_and_persists_catalog() {
        let store = Arc::new(InMemoryStore::new());
        let service = CourseCatalogService::new(store.clone());
        let courses = service.list().await.unwrap();
        assert_eq!(courses.len(), 3);
        assert!(store.get("courses").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn save_with_new_id_appends() {
        let service = service();
        let course = Course::new(CourseId::new("new"), "Networking", 2.0).unwrap();
        service.save(&course).await.unwrap();
        let courses = service.list().await.unwrap();
        assert_eq!(courses.len(), 4);
        assert_eq!(courses.last().unwrap().id(), course.id());
    }

    #[tokio::test]
    async fn save_with_existing_id_replaces_in_place() {
        let service = service();
        let mut course = service.get(&CourseId::new("2")).await.unwrap().unwrap();
        course.title = "Data Analysis, Revised".into();
        service.save(&course).await.unwrap();

        let courses = service.list().await.unwrap();
        assert_eq!(courses.len(), 3);
        assert_eq!(courses[1].title, "Data Analysis, Revised");
    }

    #[tokio::test]
    async fn save_rejects_duplicate_lesson_ids() {
        let service = service();
        let course = Course::new(CourseId::new("dup"), "Dup", 1.0)
            .unwrap()
            .with_section(CourseSection::new("a", "A").with_lesson(CourseLesson::new("x", "X")))
            .with_section(CourseSection::new("b", "B").with_lesson(CourseLesson::new("x", "X")));
        let err = service.save(&course).await.unwrap_err();
        assert!(matches!(
            err,
            CourseServiceError::Course(CourseError::DuplicateLesson(_))
        ));
        assert!(service.get(&CourseId::new("dup")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let service = service();
        assert!(service.get(&CourseId::new("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_cascades_to_enrollment_set() {
        let store = Arc::new(InMemoryStore::new());
        let service = CourseCatalogService::new(store.clone());
        store
            .set("enrolled_courses", r#"["1","2"]"#.to_owned())
            .await
            .unwrap();

        assert!(service.delete(&CourseId::new("1")).await.unwrap());
        assert_eq!(service.list().await.unwrap().len(), 2);
        assert_eq!(
            store.get("enrolled_courses").await.unwrap().as_deref(),
            Some(r#"["2"]"#)
        );
        assert!(!service.delete(&CourseId::new("1")).await.unwrap());
    }

    #[tokio::test]
    async fn create_course_generates_id() {
        let service = service();
        let created = service
            .create_course(CourseDraft {
                title: "Intro to Rust".into(),
                category: "Development".into(),
                description: String::new(),
                instructor: None,
                total_hours: 5.0,
                price: 0.0,
                tags: vec!["rust".into()],
            })
            .await
            .unwrap();
        let fetched = service.get(created.id()).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Intro to Rust");
        assert_eq!(fetched.status, CourseStatus::Draft);
    }

    #[tokio::test]
    async fn filter_by_category_tag_and_query() {
        let service = service();
        let by_category = service
            .list_filtered(&CourseFilter {
                category: Some("development".into()),
                ..CourseFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].id(), &CourseId::new("1"));

        let published = service
            .list_filtered(&CourseFilter {
                status: Some(CourseStatus::Published),
                ..CourseFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(published.len(), 2);

        let tagged = service
            .list_filtered(&CourseFilter {
                tag: Some("UX".into()),
                ..CourseFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(tagged.len(), 1);

        let searched = service
            .list_filtered(&CourseFilter {
                query: Some("datasets".into()),
                ..CourseFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].id(), &CourseId::new("2"));
    }
}
