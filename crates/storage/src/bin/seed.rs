use std::fmt;

use lms_core::model::{EnrollmentSet, WatchedLedger};
use lms_core::seed::seed_courses;
use storage::StoreKey;
use storage::repository::{Storage, save_json};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    reset_progress: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("LMS_DB_URL").unwrap_or_else(|_| "sqlite:lms.sqlite3?mode=rwc".into());
        let mut reset_progress = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--reset-progress" => reset_progress = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            reset_progress,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:lms.sqlite3?mode=rwc)");
    eprintln!("  --reset-progress          Also clear enrollments and watched lessons");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  LMS_DB_URL");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let courses = seed_courses()?;
    save_json(storage.store.as_ref(), &StoreKey::Courses, &courses).await?;

    if args.reset_progress {
        save_json(
            storage.store.as_ref(),
            &StoreKey::EnrolledCourses,
            &EnrollmentSet::new(),
        )
        .await?;
        save_json(
            storage.store.as_ref(),
            &StoreKey::WatchedVideos,
            &WatchedLedger::new(),
        )
        .await?;
    }

    println!(
        "Seeded {} courses into {}{}",
        courses.len(),
        args.db_url,
        if args.reset_progress {
            " (progress reset)"
        } else {
            ""
        }
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
