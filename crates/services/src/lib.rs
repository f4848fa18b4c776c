#![forbid(unsafe_code)]

pub mod app_services;
pub mod course_service;
pub mod enrollment_service;
pub mod error;
pub mod notes_service;
pub mod progress_service;

pub use lms_core::Clock;

pub use app_services::AppServices;
pub use course_service::{CourseCatalogService, CourseFilter};
pub use enrollment_service::EnrollmentService;
pub use error::{AppServicesError, CourseServiceError, NotesServiceError};
pub use notes_service::NotesService;
pub use progress_service::ProgressService;
