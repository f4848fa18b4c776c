use std::sync::Arc;

use lms_core::model::{CourseId, LessonId, WatchedLedger};
use lms_core::progress::{ProgressSnapshot, rollup};
use storage::StoreKey;
use storage::repository::{KeyValueStore, load_json, save_json};

use crate::course_service::CourseCatalogService;
use crate::error::CourseServiceError;

/// Records watched lessons and keeps course progress in step with them.
///
/// The ledger lives under its own key, independent of the catalog. Every
/// mark triggers a full rollup of the course, even when the lesson was
/// already watched.
#[derive(Clone)]
pub struct ProgressService {
    store: Arc<dyn KeyValueStore>,
    catalog: CourseCatalogService,
}

impl ProgressService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: CourseCatalogService) -> Self {
        Self { store, catalog }
    }

    /// Mark a lesson watched and recompute the course's progress.
    ///
    /// Returns `Ok(None)` if the catalog has no such course; the ledger is
    /// still updated in that case.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` if the ledger or catalog cannot be read
    /// or written.
    pub async fn mark_watched(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<Option<ProgressSnapshot>, CourseServiceError> {
        let mut ledger = self.load_ledger().await?;
        if ledger.mark(course_id, lesson_id.clone()) {
            save_json(self.store.as_ref(), &StoreKey::WatchedVideos, &ledger).await?;
            tracing::info!(%course_id, %lesson_id, "lesson marked watched");
        } else {
            tracing::debug!(%course_id, %lesson_id, "lesson already watched");
        }
        self.rollup_course(&ledger, course_id).await
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the ledger cannot be read.
    pub async fn is_watched(
        &self,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<bool, CourseServiceError> {
        Ok(self.load_ledger().await?.is_watched(course_id, lesson_id))
    }

    /// Watched lesson ids for a course, sorted.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the ledger cannot be read.
    pub async fn watched_lessons(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<LessonId>, CourseServiceError> {
        let ledger = self.load_ledger().await?;
        Ok(ledger
            .watched(course_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Recompute progress without recording a new mark, e.g. after the
    /// lesson tree was edited.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError` if the ledger or catalog cannot be read
    /// or written.
    pub async fn recompute(
        &self,
        course_id: &CourseId,
    ) -> Result<Option<ProgressSnapshot>, CourseServiceError> {
        let ledger = self.load_ledger().await?;
        self.rollup_course(&ledger, course_id).await
    }

    async fn rollup_course(
        &self,
        ledger: &WatchedLedger,
        course_id: &CourseId,
    ) -> Result<Option<ProgressSnapshot>, CourseServiceError> {
        let Some(mut course) = self.catalog.get(course_id).await? else {
            tracing::warn!(%course_id, "progress rollup skipped, course missing from catalog");
            return Ok(None);
        };
        let snapshot = rollup(&mut course, ledger.watched(course_id));
        self.catalog.upsert(&course).await?;
        tracing::debug!(
            %course_id,
            completed = snapshot.completed_lessons,
            total = snapshot.total_lessons,
            progress = snapshot.progress,
            "progress recomputed"
        );
        Ok(Some(snapshot))
    }

    async fn load_ledger(&self) -> Result<WatchedLedger, CourseServiceError> {
        Ok(load_json::<WatchedLedger>(self.store.as_ref(), &StoreKey::WatchedVideos)
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lms_core::model::{Course, CourseLesson, CourseSection};
    use storage::repository::InMemoryStore;

    fn services() -> (Arc<InMemoryStore>, CourseCatalogService, ProgressService) {
        let store = Arc::new(InMemoryStore::new());
        let catalog = CourseCatalogService::new(store.clone());
        let progress = ProgressService::new(store.clone(), catalog.clone());
        (store, catalog, progress)
    }

    #[tokio::test]
    async fn quarter_of_ten_hours() {
        let (_, catalog, progress) = services();
        let section = ["a", "b", "c", "d"]
            .into_iter()
            .fold(CourseSection::new("s", "S"), |s, id| {
                s.with_lesson(CourseLesson::new(id, id))
            });
        let course = Course::new(CourseId::new("ten"), "Ten", 10.0)
            .unwrap()
            .with_section(section);
        catalog.save(&course).await.unwrap();

        let snapshot = progress
            .mark_watched(&CourseId::new("ten"), &LessonId::new("a"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.progress, 25);
        assert_eq!(snapshot.hours_completed, 2.5);

        let stored = catalog.get(&CourseId::new("ten")).await.unwrap().unwrap();
        assert_eq!(stored.progress(), Some(25));
        assert_eq!(stored.hours_completed(), Some(2.5));
        assert!(stored.lesson(&LessonId::new("a")).unwrap().is_completed);
        assert!(!stored.lesson(&LessonId::new("b")).unwrap().is_completed);
    }

    #[tokio::test]
    async fn repeated_mark_leaves_state_unchanged() {
        let (store, catalog, progress) = services();
        let course = CourseId::new("1");
        progress
            .mark_watched(&course, &LessonId::new("l1"))
            .await
            .unwrap();
        let ledger_once = store.get("watched_videos").await.unwrap();
        let course_once = catalog.get(&course).await.unwrap();

        progress
            .mark_watched(&course, &LessonId::new("l1"))
            .await
            .unwrap();
        assert_eq!(store.get("watched_videos").await.unwrap(), ledger_once);
        assert_eq!(catalog.get(&course).await.unwrap(), course_once);
    }

    #[tokio::test]
    async fn unknown_course_records_ledger_only() {
        let (_, catalog, progress) = services();
        let ghost = CourseId::new("ghost");
        let result = progress
            .mark_watched(&ghost, &LessonId::new("x"))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(progress.is_watched(&ghost, &LessonId::new("x")).await.unwrap());
        assert!(catalog.get(&ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn course_without_lessons_stays_at_zero() {
        let (_, _, progress) = services();
        // Seed course 3 has no sections.
        let snapshot = progress
            .mark_watched(&CourseId::new("3"), &LessonId::new("anything"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.total_lessons, 0);
        assert_eq!(snapshot.progress, 0);
        assert_eq!(snapshot.hours_completed, 0.0);
    }

    #[tokio::test]
    async fn stored_completion_flags_do_not_count_without_ledger() {
        let (_, catalog, progress) = services();
        let id = CourseId::new("x");
        let section = ["l1", "l2", "l3", "l4"]
            .into_iter()
            .fold(CourseSection::new("s", "S"), |s, l| {
                s.with_lesson(CourseLesson {
                    is_completed: l == "l1" || l == "l2",
                    ..CourseLesson::new(l, l)
                })
            });
        let course = Course::new(id.clone(), "Flags", 4.0)
            .unwrap()
            .with_section(section);
        catalog.save(&course).await.unwrap();

        let first = progress.recompute(&id).await.unwrap().unwrap();
        assert_eq!(first.progress, 0);
        assert_eq!(first.hours_completed, 0.0);

        let second = progress
            .mark_watched(&id, &LessonId::new("l3"))
            .await
            .unwrap()
            .unwrap();
        assert!(second.progress >= first.progress);
        assert_eq!(second.progress, 25);

        let stored = catalog.get(&id).await.unwrap().unwrap();
        let flags: Vec<_> = stored.lessons().map(|l| l.is_completed).collect();
        assert_eq!(flags, vec![false, false, true, false]);
    }

    #[tokio::test]
    async fn recompute_picks_up_new_lessons() {
        let (_, catalog, progress) = services();
        let id = CourseId::new("1");
        for lesson in ["l1", "l2"] {
            progress
                .mark_watched(&id, &LessonId::new(lesson))
                .await
                .unwrap();
        }
        let mut course = catalog.get(&id).await.unwrap().unwrap();
        course.sections[0]
            .lessons
            .extend(["l5", "l6", "l7", "l8"].map(|l| CourseLesson::new(l, l)));
        catalog.save(&course).await.unwrap();

        let snapshot = progress.recompute(&id).await.unwrap().unwrap();
        assert_eq!(snapshot.total_lessons, 8);
        assert_eq!(snapshot.progress, 25);
        assert_eq!(
            progress.watched_lessons(&id).await.unwrap(),
            vec![LessonId::new("l1"), LessonId::new("l2")]
        );
    }
}
