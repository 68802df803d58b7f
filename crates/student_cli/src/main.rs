//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `student_core` wiring against a
//!   real database file.
//! - Keep output deterministic for quick local sanity checks.
//!
//! # Usage
//! - `student_cli [list]` prints every stored student.
//! - `student_cli demo` runs create -> list -> update -> get -> delete on a
//!   throwaway record. It refuses to start if that id is already taken and
//!   removes the record again if a later step fails.
//!
//! Environment: `STUDENT_DB_PATH` overrides the database file,
//! `STUDENT_LOG_DIR` (absolute) enables file logs at `STUDENT_LOG_LEVEL`.

use log::{info, warn};
use std::error::Error;
use std::process::ExitCode;
use student_core::{
    core_version, default_log_level, init_logging, SqliteStudentStore, StoreConfig, Student,
    StudentRepository, StudentService,
};

const DB_PATH_ENV: &str = "STUDENT_DB_PATH";
const LOG_DIR_ENV: &str = "STUDENT_LOG_DIR";
const LOG_LEVEL_ENV: &str = "STUDENT_LOG_LEVEL";
const DEMO_STUDENT_ID: &str = "99999";

type CliResult = Result<(), Box<dyn Error>>;

fn main() -> ExitCode {
    println!("student_core version={}", core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult {
    setup_logging()?;

    let command = std::env::args().nth(1).unwrap_or_else(|| "list".to_string());
    let store = SqliteStudentStore::open_with_config(resolve_config())?;
    println!("database={}", store.path().display());
    let service = StudentService::new(store);

    match command.as_str() {
        "list" => run_list(&service),
        "demo" => run_demo(&service),
        other => Err(format!("unknown command `{other}`; expected list|demo").into()),
    }
}

fn setup_logging() -> CliResult {
    let Some(log_dir) = env_value(LOG_DIR_ENV) else {
        return Ok(());
    };
    let level = env_value(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, &log_dir)?;
    Ok(())
}

fn resolve_config() -> StoreConfig {
    match env_value(DB_PATH_ENV) {
        Some(path) => StoreConfig::default().with_db_path(path),
        None => StoreConfig::default(),
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn run_list<R: StudentRepository>(service: &StudentService<R>) -> CliResult {
    let students = service.list()?;
    println!("students={}", students.len());
    for student in &students {
        println!("{student}");
    }
    Ok(())
}

fn run_demo<R: StudentRepository>(service: &StudentService<R>) -> CliResult {
    info!("event=cli_demo module=cli status=start");

    if service.get(DEMO_STUDENT_ID)?.is_some() {
        return Err(format!(
            "student {DEMO_STUDENT_ID} already exists; refusing to run demo over real data"
        )
        .into());
    }

    let student = Student::new(DEMO_STUDENT_ID, "Test", "Ogrenci", 20, 85.5)?;
    service.create(&student)?;
    println!("created {student}");

    if let Err(err) = run_demo_steps(service, student) {
        if let Err(cleanup_err) = service.delete(DEMO_STUDENT_ID) {
            warn!(
                "event=cli_demo_cleanup module=cli status=error error={}",
                cleanup_err
            );
        }
        info!("event=cli_demo module=cli status=error");
        return Err(err);
    }

    info!("event=cli_demo module=cli status=ok");
    Ok(())
}

fn run_demo_steps<R: StudentRepository>(
    service: &StudentService<R>,
    mut student: Student,
) -> CliResult {
    run_list(service)?;

    student.set_age(21)?;
    student.set_gpa(90.0)?;
    service.update(&student)?;
    match service.get(DEMO_STUDENT_ID)? {
        Some(updated) => println!("updated {updated}"),
        None => return Err(format!("student {DEMO_STUDENT_ID} vanished after update").into()),
    }

    service.delete(DEMO_STUDENT_ID)?;
    println!("deleted {DEMO_STUDENT_ID}");
    run_list(service)
}
