use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::course_service::CourseCatalogService;
use crate::enrollment_service::EnrollmentService;
use crate::error::AppServicesError;
use crate::notes_service::NotesService;
use crate::progress_service::ProgressService;

/// Assembles app-facing services over a single store.
///
/// Built once per process and handed out by reference; every service shares
/// the same backing store.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<CourseCatalogService>,
    enrollment: Arc<EnrollmentService>,
    progress: Arc<ProgressService>,
    notes: Arc<NotesService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over a fresh in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let catalog = CourseCatalogService::new(Arc::clone(&storage.store));
        let enrollment = EnrollmentService::new(Arc::clone(&storage.store), catalog.clone());
        let progress = ProgressService::new(Arc::clone(&storage.store), catalog.clone());
        let notes = NotesService::new(clock, Arc::clone(&storage.store));

        Self {
            catalog: Arc::new(catalog),
            enrollment: Arc::new(enrollment),
            progress: Arc::new(progress),
            notes: Arc::new(notes),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CourseCatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn enrollment(&self) -> Arc<EnrollmentService> {
        Arc::clone(&self.enrollment)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn notes(&self) -> Arc<NotesService> {
        Arc::clone(&self.notes)
    }
}
