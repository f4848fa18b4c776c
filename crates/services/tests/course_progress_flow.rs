use lms_core::model::{Course, CourseId, CourseLesson, CourseSection, LessonId, UserId};
use lms_core::time::fixed_clock;
use services::AppServices;
use storage::repository::Storage;

fn scenario_course() -> Course {
    Course::new(CourseId::new("1"), "Scenario", 4.5)
        .unwrap()
        .with_section(
            CourseSection::new("s1", "Only section")
                .with_lesson(CourseLesson::new("l1", "One"))
                .with_lesson(CourseLesson::new("l2", "Two"))
                .with_lesson(CourseLesson::new("l3", "Three"))
                .with_lesson(CourseLesson::new("l4", "Four")),
        )
}

#[tokio::test]
async fn watching_lessons_rolls_up_progress() {
    let app = AppServices::new_sqlite(
        "sqlite:file:memdb_progress_flow?mode=memory&cache=shared",
        fixed_clock(),
    )
    .await
    .expect("connect sqlite");
    let catalog = app.catalog();
    let progress = app.progress();
    catalog.save(&scenario_course()).await.expect("save course");

    let id = CourseId::new("1");
    let first = progress
        .mark_watched(&id, &LessonId::new("l1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.progress, 25);
    assert_eq!(first.hours_completed, 1.125);

    let second = progress
        .mark_watched(&id, &LessonId::new("l2"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.progress, 50);
    assert_eq!(second.hours_completed, 2.25);

    let before = catalog.get(&id).await.unwrap();
    let again = progress
        .mark_watched(&id, &LessonId::new("l1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again, second);
    assert_eq!(catalog.get(&id).await.unwrap(), before);

    assert!(progress.is_watched(&id, &LessonId::new("l2")).await.unwrap());
    assert!(!progress.is_watched(&id, &LessonId::new("l3")).await.unwrap());
}

#[tokio::test]
async fn enroll_unenroll_round_trip() {
    let app = AppServices::new_sqlite(
        "sqlite:file:memdb_enroll_flow?mode=memory&cache=shared",
        fixed_clock(),
    )
    .await
    .expect("connect sqlite");
    let id = CourseId::new("2");

    app.enrollment().enroll(&id).await.unwrap();
    let enrolled = app.enrollment().list_enrolled().await.unwrap();
    assert_eq!(enrolled.len(), 1);
    assert_eq!(enrolled[0].progress(), Some(0));

    app.enrollment().unenroll(&id).await.unwrap();
    assert!(app.enrollment().list_enrolled().await.unwrap().is_empty());
    let course = app.catalog().get(&id).await.unwrap().unwrap();
    assert!(!course.is_enrolled());
    assert_eq!(course.progress(), None);
    assert_eq!(course.hours_completed(), None);
}

#[tokio::test]
async fn deleting_enrolled_course_cleans_up() {
    let app = AppServices::in_memory(fixed_clock());
    let id = CourseId::new("1");
    app.enrollment().enroll(&id).await.unwrap();
    app.notes()
        .save_note(&UserId::new("me"), &LessonId::new("l1"), "keep this")
        .await
        .unwrap();

    assert!(app.catalog().delete(&id).await.unwrap());
    assert!(!app.enrollment().is_enrolled(&id).await.unwrap());
    assert!(app.catalog().get(&id).await.unwrap().is_none());
    // Notes are not tied to the catalog.
    assert_eq!(
        app.notes()
            .list_notes(&UserId::new("me"))
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn stored_course_with_repeated_lesson_ids_accepts_updates() {
    let storage = Storage::in_memory();
    storage
        .store
        .set(
            "courses",
            r#"[{"id":"1","title":"Imported","totalHours":3.0,"sections":[
                {"id":"s1","title":"A","lessons":[{"id":"x","title":"X"}]},
                {"id":"s2","title":"B","lessons":[{"id":"x","title":"X again"},{"id":"y","title":"Y"}]}
            ]}]"#
                .to_string(),
        )
        .await
        .unwrap();
    let app = AppServices::from_storage(&storage, fixed_clock());
    let id = CourseId::new("1");

    assert!(app.enrollment().enroll(&id).await.unwrap());
    let course = app.catalog().get(&id).await.unwrap().unwrap();
    assert!(course.is_enrolled());
    assert_eq!(course.progress(), Some(0));

    let snapshot = app
        .progress()
        .mark_watched(&id, &LessonId::new("x"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.total_lessons, 3);
    assert_eq!(snapshot.completed_lessons, 2);
    let course = app.catalog().get(&id).await.unwrap().unwrap();
    assert_eq!(course.progress(), Some(67));

    assert!(app.enrollment().unenroll(&id).await.unwrap());
    let course = app.catalog().get(&id).await.unwrap().unwrap();
    assert!(!course.is_enrolled());

    // Admin edits are still validated.
    assert!(app.catalog().save(&course).await.is_err());
}
