mod course;
mod enrollment;
mod ids;
mod ledger;
mod note;

pub use course::{
    AssignmentSummary, Course, CourseDraft, CourseError, CourseLesson, CourseSection,
    CourseStatus, Instructor, QuizSummary,
};
pub use enrollment::EnrollmentSet;
pub use ids::{CourseId, InstructorId, LessonId, ParseIdError, SectionId, UserId};
pub use ledger::WatchedLedger;
pub use note::{LessonNote, NoteBook, NoteError};
