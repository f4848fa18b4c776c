//! Built-in catalog used on first run when nothing has been persisted yet.

use crate::model::{
    AssignmentSummary, Course, CourseError, CourseId, CourseLesson, CourseSection, CourseStatus,
    Instructor, InstructorId, QuizSummary,
};

/// Returns the seed catalog.
///
/// # Errors
///
/// Returns `CourseError` if a seed record fails validation.
pub fn seed_courses() -> Result<Vec<Course>, CourseError> {
    let mut web = Course::new(CourseId::new("1"), "Modern Web Development", 4.5)?
        .with_category("Development")
        .with_description("Build and ship a full-stack web application from scratch.")
        .with_instructor(Instructor {
            id: InstructorId::new("i1"),
            name: "Sarah Johnson".into(),
            role: "Senior Frontend Engineer".into(),
        })
        .with_section(
            CourseSection::new("s1", "Getting Started")
                .with_duration("45 min")
                .with_lesson(
                    CourseLesson::new("l1", "Course Overview")
                        .with_duration("10:00")
                        .with_video_url("https://videos.example.com/web/overview.mp4"),
                )
                .with_lesson(
                    CourseLesson::new("l2", "Tooling Setup")
                        .with_duration("12:30")
                        .with_video_url("https://videos.example.com/web/tooling.mp4"),
                )
                .with_lesson(
                    CourseLesson::new("l3", "Project Structure")
                        .with_duration("9:45")
                        .with_video_url("https://videos.example.com/web/structure.mp4"),
                )
                .with_lesson(
                    CourseLesson::new("l4", "First Deploy")
                        .with_duration("13:15")
                        .with_video_url("https://videos.example.com/web/deploy.mp4"),
                ),
        )
        .with_status(CourseStatus::Published)
        .with_price(49.0)
        .with_tags(["web", "javascript", "fullstack"]);
    web.assignments.push(AssignmentSummary {
        id: "a1".into(),
        title: "Deploy a static site".into(),
        due_date: None,
    });
    web.quizzes.push(QuizSummary {
        id: "q1".into(),
        title: "Tooling basics".into(),
        question_count: 5,
    });

    let data = Course::new(CourseId::new("2"), "Data Analysis Fundamentals", 6.0)?
        .with_category("Data Science")
        .with_description("Clean, explore and visualise real-world datasets.")
        .with_instructor(Instructor {
            id: InstructorId::new("i2"),
            name: "Miguel Alvarez".into(),
            role: "Data Scientist".into(),
        })
        .with_section(
            CourseSection::new("s1", "Working with Data")
                .with_duration("1h 10min")
                .with_lesson(CourseLesson::new("d1", "Loading Datasets"))
                .with_lesson(CourseLesson::new("d2", "Cleaning Values"))
                .with_lesson(CourseLesson::new("d3", "Grouping and Aggregation")),
        )
        .with_section(
            CourseSection::new("s2", "Visualisation")
                .with_duration("50 min")
                .with_lesson(CourseLesson::new("d4", "Choosing a Chart"))
                .with_lesson(CourseLesson::new("d5", "Telling the Story")),
        )
        .with_status(CourseStatus::Published)
        .with_tags(["data", "python"]);

    let design = Course::new(CourseId::new("3"), "UX Design Principles", 3.0)?
        .with_category("Design")
        .with_description("Usability heuristics and prototyping, module outline in progress.")
        .with_status(CourseStatus::Draft)
        .with_price(29.0)
        .with_tags(["design", "ux"]);

    Ok(vec![web, data, design])
}
