use std::fmt;

use lms_core::model::{Course, CourseId, CourseStatus, LessonId, UserId};
use services::{AppServices, Clock, CourseFilter};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidStatus { raw: String },
    InvalidId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidStatus { raw } => {
                write!(f, "invalid --status value (expected published|draft): {raw}")
            }
            ArgsError::InvalidId { raw } => write!(f, "invalid id: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_positional(
    positional: &mut impl Iterator<Item = String>,
    command: &'static str,
    name: &'static str,
) -> Result<String, ArgsError> {
    positional
        .next()
        .ok_or(ArgsError::MissingArgument { command, name })
}

fn parse_id<T: std::str::FromStr>(raw: String) -> Result<T, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidId { raw })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Courses(CourseFilter),
    Show(CourseId),
    Enroll(CourseId),
    Unenroll(CourseId),
    Enrolled,
    Watch(CourseId, LessonId),
    Note(LessonId, String),
    Notes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Sqlite(String),
    Memory,
}

#[derive(Debug)]
struct Args {
    backend: Backend,
    user_id: UserId,
    command: Command,
}

impl Args {
    fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("LMS_DB_URL")
            .ok()
            .map_or_else(
                || normalize_sqlite_url("sqlite:lms.sqlite3".into()),
                normalize_sqlite_url,
            );
        let mut memory = false;
        let mut user_id = std::env::var("LMS_USER_ID")
            .ok()
            .and_then(|raw| raw.parse::<UserId>().ok())
            .unwrap_or_else(|| UserId::new("demo-user"));
        let mut filter = CourseFilter::default();
        let mut positional = Vec::new();

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--memory" => memory = true,
                "--user" => user_id = parse_id(require_value(&mut args, "--user")?)?,
                "--category" => filter.category = Some(require_value(&mut args, "--category")?),
                "--tag" => filter.tag = Some(require_value(&mut args, "--tag")?),
                "--query" => filter.query = Some(require_value(&mut args, "--query")?),
                "--status" => {
                    let value = require_value(&mut args, "--status")?;
                    filter.status = Some(match value.as_str() {
                        "published" => CourseStatus::Published,
                        "draft" => CourseStatus::Draft,
                        _ => return Err(ArgsError::InvalidStatus { raw: value }),
                    });
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => {
                    if arg.starts_with("--") {
                        return Err(ArgsError::UnknownArg(arg));
                    }
                    positional.push(arg);
                }
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("courses") => Command::Courses(filter),
            Some("show") => Command::Show(parse_id(require_positional(
                &mut positional,
                "show",
                "course-id",
            )?)?),
            Some("enroll") => Command::Enroll(parse_id(require_positional(
                &mut positional,
                "enroll",
                "course-id",
            )?)?),
            Some("unenroll") => Command::Unenroll(parse_id(require_positional(
                &mut positional,
                "unenroll",
                "course-id",
            )?)?),
            Some("enrolled") => Command::Enrolled,
            Some("watch") => {
                let course = parse_id(require_positional(&mut positional, "watch", "course-id")?)?;
                let lesson = parse_id(require_positional(&mut positional, "watch", "lesson-id")?)?;
                Command::Watch(course, lesson)
            }
            Some("note") => {
                let lesson = parse_id(require_positional(&mut positional, "note", "lesson-id")?)?;
                let words: Vec<String> = positional.by_ref().collect();
                if words.is_empty() {
                    return Err(ArgsError::MissingArgument {
                        command: "note",
                        name: "text",
                    });
                }
                Command::Note(lesson, words.join(" "))
            }
            Some("notes") => Command::Notes,
            Some(other) => return Err(ArgsError::UnknownCommand(other.to_owned())),
        };
        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self {
            backend: if memory {
                Backend::Memory
            } else {
                Backend::Sqlite(db_url)
            },
            user_id,
            command,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  courses                     List the catalog (default)");
    eprintln!("  show <course-id>            Show a course and its lessons");
    eprintln!("  enroll <course-id>          Enroll in a course");
    eprintln!("  unenroll <course-id>        Leave a course");
    eprintln!("  enrolled                    List enrolled courses");
    eprintln!("  watch <course-id> <lesson>  Mark a lesson watched");
    eprintln!("  note <lesson-id> <text...>  Save a note for a lesson");
    eprintln!("  notes                       List your notes");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>           SQLite URL (default: ./lms.sqlite3)");
    eprintln!("  --memory                    Use a throwaway in-memory store");
    eprintln!("  --user <id>                 Note owner (default: demo-user)");
    eprintln!("  --category, --tag, --query, --status   Filters for `courses`");
    eprintln!("  -h, --help                  Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LMS_DB_URL, LMS_USER_ID, RUST_LOG");
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn course_line(course: &Course) -> String {
    let status = match course.status {
        CourseStatus::Published => "published",
        CourseStatus::Draft => "draft",
    };
    let progress = course
        .progress()
        .map(|p| {
            let done = course.hours_completed().unwrap_or(0.0);
            format!(" {p}% ({done:.2}/{}h)", course.total_hours)
        })
        .unwrap_or_default();
    let enrolled = if course.is_enrolled() { " [enrolled]" } else { "" };
    format!(
        "{:<38} {:<30} {:<14} {status}{enrolled}{progress}",
        course.id(),
        course.title,
        course.category
    )
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let app = match &args.backend {
        Backend::Memory => AppServices::in_memory(Clock::System),
        Backend::Sqlite(db_url) => {
            prepare_sqlite_file(db_url)?;
            AppServices::new_sqlite(db_url, Clock::System).await?
        }
    };
    tracing::debug!(backend = ?args.backend, user = %args.user_id, "services ready");

    match args.command {
        Command::Courses(filter) => {
            for course in app.catalog().list_filtered(&filter).await? {
                println!("{}", course_line(&course));
            }
        }
        Command::Show(id) => {
            let Some(course) = app.catalog().get(&id).await? else {
                println!("no course with id {id}");
                return Ok(());
            };
            println!("{}", course_line(&course));
            if !course.description.is_empty() {
                println!("  {}", course.description);
            }
            let watched = app.progress().watched_lessons(&id).await?;
            for section in &course.sections {
                println!("  {} ({})", section.title, section.duration);
                for lesson in &section.lessons {
                    let done = watched.contains(&lesson.id);
                    let mark = if done { "x" } else { " " };
                    println!("    [{mark}] {:<6} {}", lesson.id, lesson.title);
                }
            }
        }
        Command::Enroll(id) => {
            if app.enrollment().enroll(&id).await? {
                println!("enrolled in {id}");
            } else {
                println!("already enrolled in {id}");
            }
        }
        Command::Unenroll(id) => {
            if app.enrollment().unenroll(&id).await? {
                println!("left {id}");
            } else {
                println!("not enrolled in {id}");
            }
        }
        Command::Enrolled => {
            for course in app.enrollment().list_enrolled().await? {
                println!("{}", course_line(&course));
            }
        }
        Command::Watch(course_id, lesson_id) => {
            match app.progress().mark_watched(&course_id, &lesson_id).await? {
                Some(snapshot) => println!(
                    "{course_id}: {}/{} lessons, {}% ({:.2}h)",
                    snapshot.completed_lessons,
                    snapshot.total_lessons,
                    snapshot.progress,
                    snapshot.hours_completed
                ),
                None => println!("recorded {lesson_id}, but course {course_id} is not in the catalog"),
            }
        }
        Command::Note(lesson_id, text) => {
            let note = app.notes().save_note(&args.user_id, &lesson_id, &text).await?;
            println!("saved note for {lesson_id} at {}", note.updated_at().to_rfc3339());
        }
        Command::Notes => {
            for (lesson_id, note) in app.notes().list_notes(&args.user_id).await? {
                println!(
                    "{:<8} {}  {}",
                    lesson_id,
                    note.updated_at().format("%Y-%m-%d %H:%M"),
                    note.content()
                );
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
