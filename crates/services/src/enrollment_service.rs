use std::sync::Arc;

use lms_core::model::{Course, CourseId, EnrollmentSet};
use storage::StoreKey;
use storage::repository::{KeyValueStore, load_json, save_json};

use crate::course_service::CourseCatalogService;
use crate::error::CourseServiceError;

/// Tracks which courses the learner is enrolled in.
///
/// The enrollment set is persisted on its own key and is updated even when
/// the catalog has no record for the id; the course-side update is then
/// skipped.
#[derive(Clone)]
pub struct EnrollmentService {
    store: Arc<dyn KeyValueStore>,
    catalog: CourseCatalogService,
}

impl EnrollmentService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: CourseCatalogService) -> Self {
        Self { store, catalog }
    }

    /// Enroll in a course, resetting its progress to zero.
    ///
    /// Returns `false` without touching anything if already enrolled.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` if the set or catalog cannot be read or written.
    pub async fn enroll(&self, course_id: &CourseId) -> Result<bool, CourseServiceError> {
        let mut set = self.load_set().await?;
        if !set.insert(course_id.clone()) {
            tracing::debug!(%course_id, "already enrolled");
            return Ok(false);
        }
        self.save_set(&set).await?;

        match self.catalog.get(course_id).await? {
            Some(mut course) => {
                course.mark_enrolled();
                self.catalog.upsert(&course).await?;
            }
            None => tracing::warn!(%course_id, "enrolled in course missing from catalog"),
        }
        tracing::info!(%course_id, "enrolled");
        Ok(true)
    }

    /// Leave a course and strip enrollment-derived fields from its record.
    ///
    /// Returns `true` if the course was in the enrollment set.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` if the set or catalog cannot be read or written.
    pub async fn unenroll(&self, course_id: &CourseId) -> Result<bool, CourseServiceError> {
        let mut set = self.load_set().await?;
        let was_enrolled = set.remove(course_id);
        self.save_set(&set).await?;

        match self.catalog.get(course_id).await? {
            Some(mut course) => {
                course.clear_enrollment();
                self.catalog.upsert(&course).await?;
            }
            None => tracing::warn!(%course_id, "unenrolled from course missing from catalog"),
        }
        tracing::info!(%course_id, was_enrolled, "unenrolled");
        Ok(was_enrolled)
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the set cannot be read.
    pub async fn is_enrolled(&self, course_id: &CourseId) -> Result<bool, CourseServiceError> {
        Ok(self.load_set().await?.contains(course_id))
    }

    /// Courses in the enrollment set that exist in the catalog, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the set or catalog cannot be read.
    pub async fn list_enrolled(&self) -> Result<Vec<Course>, CourseServiceError> {
        let set = self.load_set().await?;
        if set.is_empty() {
            return Ok(Vec::new());
        }
        let courses = self.catalog.list().await?;
        Ok(courses
            .into_iter()
            .filter(|course| set.contains(course.id()))
            .collect())
    }

    async fn load_set(&self) -> Result<EnrollmentSet, CourseServiceError> {
        Ok(load_json::<EnrollmentSet>(self.store.as_ref(), &StoreKey::EnrolledCourses)
            .await?
            .unwrap_or_default())
    }

    async fn save_set(&self, set: &EnrollmentSet) -> Result<(), CourseServiceError> {
        save_json(self.store.as_ref(), &StoreKey::EnrolledCourses, set).await?;
        Ok(())
    }
}
