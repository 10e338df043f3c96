pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use error::*;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Mutex;

use crate::config::{Config, ReportConfig};
use crate::exercise::Exercise;
use crate::grading::{Assertion, CodeRunner, GradingResult};
use crate::session::Session;
use crate::style;

pub fn init_config(dir: impl AsRef<Path>) -> Result<()> {
    let filepath = dir.as_ref().join(Config::FILENAME);
    let toml = Config::example_toml()?;
    fsutil::write_new_with_mkdir(&filepath, toml)
        .with_context(|| format!("Failed to write {}", filepath.to_string_lossy()))
}

pub fn load_exercise(exercise_file: impl AsRef<Path>) -> Result<Exercise> {
    let exercise_file = exercise_file.as_ref();
    Exercise::from_file(exercise_file).with_context(|| {
        format!(
            "Failed to load exercise {}",
            exercise_file.to_string_lossy()
        )
    })
}

pub fn read_program(program_file: impl AsRef<Path>, cfg: &Config) -> Result<String> {
    let program_file = program_file.as_ref();
    fsutil::read_to_string_with_limit(program_file, cfg.runner.max_source_bytes as u64)
        .with_context(|| format!("Failed to read {}", program_file.to_string_lossy()))
}

/// Runs `source` on a fresh session while a spinner shows `label`.
pub async fn grade_with_spinner(
    label: &str,
    source: String,
    assertions: Vec<Assertion>,
    cfg: &Config,
) -> Result<GradingResult> {
    let session = Session::new(CodeRunner::from_config(&cfg.runner));

    let style = ProgressStyle::default_bar()
        .template("{spinner} {msg}")
        .context("Invalid progress bar template")?;
    let bar = ProgressBar::new_spinner()
        .with_style(style)
        .with_message(format!("Running {} ...", label));
    let bar = Arc::new(Mutex::new(bar));

    // Tick spinner
    let ticker = bar.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let bar = ticker.lock().await;
            if bar.is_finished() {
                break;
            }
            bar.tick();
        }
    });

    let res = session.run(source, assertions).await;
    bar.lock().await.finish_and_clear();

    res.context("The run was superseded before it finished")
}

pub async fn do_run(program_file: impl AsRef<Path>, cfg: &Config) -> Result<GradingResult> {
    let program_file = program_file.as_ref();
    let source = self::read_program(program_file, cfg)?;
    let label = program_file.to_string_lossy();

    log::info!("Running {}", label);
    let res = self::grade_with_spinner(&label, source, Vec::new(), cfg).await?;

    style::print_run_output(&res);
    Ok(res)
}

/// Grades `program_file` against the exercise's test cases.
/// With `program_file == None` the exercise's own solution is graded.
pub async fn do_check(
    exercise_file: impl AsRef<Path>,
    program_file: Option<&Path>,
    cfg: &Config,
) -> Result<GradingResult> {
    let exercise = self::load_exercise(&exercise_file)?;
    let res = self::check_exercise(&exercise, program_file, cfg).await?;
    print_check_report(&res, &exercise, &cfg.report);
    Ok(res)
}

/// [`do_check`] without printing the report.
pub async fn check_exercise(
    exercise: &Exercise,
    program_file: Option<&Path>,
    cfg: &Config,
) -> Result<GradingResult> {
    ensure!(!exercise.test_cases.is_empty(), "The exercise has no test cases");

    let (label, source) = match program_file {
        Some(path) => (
            path.to_string_lossy().into_owned(),
            self::read_program(path, cfg)?,
        ),
        None => {
            ensure!(
                !exercise.solution.trim().is_empty(),
                "The exercise has no solution"
            );
            ("the solution".to_owned(), exercise.solution.clone())
        }
    };

    log::info!(
        "Checking {} against {} test cases",
        label,
        exercise.test_cases.len()
    );
    self::grade_with_spinner(&label, source, exercise.test_cases.clone(), cfg).await
}

pub fn print_check_report(res: &GradingResult, exercise: &Exercise, cfg: &ReportConfig) {
    style::print_verdict_list(res);

    if let Some(error) = &res.error {
        println!(
            "\n{}: {}",
            style::failure_label(res.error_kind).bright_red().bold(),
            error.bright_red()
        );
    } else {
        res.failed_verdicts().for_each(style::print_verdict_detail);
    }
    print!("\n");

    style::print_grading_summary(res);

    if !res.all_passed && cfg.show_hints_on_failure {
        style::print_hints(&exercise.hints_up_to(cfg.max_hint_level));
    }
}

pub fn show_hints(exercise_file: impl AsRef<Path>, level: u32) -> Result<()> {
    let exercise = self::load_exercise(&exercise_file)?;
    let Some(max_level) = exercise.max_hint_level() else {
        bail!("The exercise has no hints")
    };
    let hints = exercise.hints_up_to(level);
    ensure!(
        !hints.is_empty(),
        "No hints up to level {} (levels go up to {})",
        level,
        max_level
    );
    style::print_hints(&hints);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("jsgrade-action-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    const EXERCISE_TOML: &str = r#"
description = "Print the sum of 1 and 2"
solution = "console.log(1 + 2)"

[[testCases]]
name = "prints 3"
expectedOutput = "3"

[[hints]]
level = 1
text = "Use console.log"
"#;

    #[test]
    fn init_config_refuses_to_overwrite() {
        let dir = temp_dir("init");
        init_config(&dir).unwrap();

        let written = fsutil::read_to_string(dir.join(Config::FILENAME)).unwrap();
        assert!(Config::from_toml(&written).is_ok());

        assert!(init_config(&dir).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn oversized_program_is_not_read() {
        let dir = temp_dir("oversized");
        let program = dir.join("big.js");
        fsutil::write_with_mkdir(&program, "x".repeat(64)).unwrap();

        let mut cfg = Config::default();
        cfg.runner.max_source_bytes = 16;
        assert!(read_program(&program, &cfg).is_err());

        cfg.runner.max_source_bytes = 64;
        assert_eq!(read_program(&program, &cfg).unwrap().len(), 64);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn check_grades_solution_and_program_file() {
        let dir = temp_dir("check");
        let exercise = dir.join("sum.toml");
        let wrong = dir.join("wrong.js");
        fsutil::write_with_mkdir(&exercise, EXERCISE_TOML).unwrap();
        fsutil::write_with_mkdir(&wrong, "console.log(12)").unwrap();

        let cfg = Config::default();
        let res = do_check(&exercise, None, &cfg).await.unwrap();
        assert!(res.all_passed);

        let res = do_check(&exercise, Some(wrong.as_path()), &cfg).await.unwrap();
        assert!(!res.all_passed);
        assert_eq!(res.output, "12");

        assert!(show_hints(&exercise, 1).is_ok());
        assert!(show_hints(&exercise, 0).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
